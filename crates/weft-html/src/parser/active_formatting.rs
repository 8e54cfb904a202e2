//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//!
//! "Initially, the list of active formatting elements is empty. It is used to
//! handle mis-nested formatting element tags."
//!
//! Only the newest [`FORMATTING_WINDOW`] entries take part in the Noah's Ark
//! check and in reconstruction; older entries are never recreated.

use weft_dom::NodeId;

use super::open_elements::{MAX_QUEUE_DEPTH, StackOfOpenElements};
use crate::tokenizer::{Attribute, Token};

/// How many of the newest entries are scanned for Noah's Ark matches and
/// recreated by reconstruction.
pub const FORMATTING_WINDOW: usize = 12;

/// An entry in the list of active formatting elements.
#[derive(Debug, Clone)]
pub enum ActiveFormattingElement {
    /// A formatting element entry.
    ///
    /// "The list contains elements in the formatting category..."
    Element {
        /// The element in the DOM tree.
        node_id: NodeId,
        /// The start tag the element was created from, kept to recreate it.
        token: Token,
    },
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    ///
    /// Pushed when entering applet, object, marquee, template, td, th and
    /// caption.
    Marker,
}

impl ActiveFormattingElement {
    /// The element of a non-marker entry.
    #[must_use]
    pub const fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Element { node_id, .. } => Some(*node_id),
            Self::Marker => None,
        }
    }

    fn tag_name(&self) -> Option<&str> {
        match self {
            Self::Element { token, .. } => token.tag_name(),
            Self::Marker => None,
        }
    }
}

fn attributes(token: &Token) -> &[Attribute] {
    match token {
        Token::StartTag { attributes, .. } | Token::EndTag { attributes, .. } => attributes,
        _ => &[],
    }
}

/// Same tag name and the same attribute set, in any order. Namespace is not
/// compared.
fn is_same_formatting_element(a: &Token, b: &Token) -> bool {
    if a.tag_name() != b.tag_name() {
        return false;
    }
    let (a, b) = (attributes(a), attributes(b));
    a.len() == b.len()
        && a
            .iter()
            .all(|attr| b.iter().any(|other| other.name == attr.name && other.value == attr.value))
}

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
#[derive(Debug, Default, Clone)]
pub struct ActiveFormattingElements {
    entries: Vec<ActiveFormattingElement>,
}

impl ActiveFormattingElements {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of entries, markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the list holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ActiveFormattingElement> {
        self.entries.get(index)
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "If there are already three elements in the list of active formatting
    /// elements after the last marker, if any, or anywhere in the list if there
    /// are no markers, that have the same tag name, namespace, and attributes
    /// as element, then remove the earliest such element from the list of
    /// active formatting elements."
    pub fn push(&mut self, node_id: NodeId, token: Token) {
        self.remove_fourth_twin(&token);
        self.entries
            .push(ActiveFormattingElement::Element { node_id, token });
    }

    /// Insert at `bookmark`, as the adoption agency does. A bookmark past the
    /// end appends.
    pub fn insert_at(&mut self, bookmark: usize, node_id: NodeId, token: Token) {
        self.remove_fourth_twin(&token);
        let entry = ActiveFormattingElement::Element { node_id, token };
        if bookmark <= self.entries.len() {
            self.entries.insert(bookmark, entry);
        } else {
            self.entries.push(entry);
        }
    }

    fn remove_fourth_twin(&mut self, token: &Token) {
        let ceil = self.entries.len().saturating_sub(FORMATTING_WINDOW);
        let mut seen = 0;
        for index in (ceil..self.entries.len()).rev() {
            let ActiveFormattingElement::Element {
                token: existing, ..
            } = &self.entries[index]
            else {
                break;
            };
            if is_same_formatting_element(existing, token) {
                seen += 1;
            }
            if seen == 3 {
                let _ = self.entries.remove(index);
                break;
            }
        }
    }

    /// "Insert a marker at the end of the list of active formatting elements."
    pub fn insert_marker(&mut self) {
        self.entries.push(ActiveFormattingElement::Marker);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    ///
    /// 1. "Let entry be the last (most recently added) entry in the list."
    /// 2. "Remove entry from the list."
    /// 3. "If entry was a marker, then stop the algorithm at this point."
    /// 4. "Go to step 1."
    pub fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if matches!(entry, ActiveFormattingElement::Marker) {
                break;
            }
        }
    }

    /// Index of `node_id` in the list.
    #[must_use]
    pub fn position(&self, node_id: NodeId) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|entry| entry.node_id() == Some(node_id))
    }

    /// Whether `node_id` is in the list, looking at most [`MAX_QUEUE_DEPTH`]
    /// entries back.
    #[must_use]
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.entries
            .iter()
            .rev()
            .take(MAX_QUEUE_DEPTH + 1)
            .any(|entry| entry.node_id() == Some(node_id))
    }

    /// Remove `node_id` from the list. Returns the index it had.
    pub fn remove(&mut self, node_id: NodeId) -> Option<usize> {
        let index = self.position(node_id)?;
        let _ = self.entries.remove(index);
        Some(index)
    }

    /// Replace the entry for `out` with one for `node_id`, keeping `token`.
    ///
    /// # Panics
    ///
    /// Panics if `out` is not in the list.
    pub fn replace(&mut self, out: NodeId, node_id: NodeId, token: Token) {
        let Some(index) = self.position(out) else {
            panic!("replace: {out:?} is not in the list of active formatting elements");
        };
        self.entries[index] = ActiveFormattingElement::Element { node_id, token };
    }

    /// Replace the entry at `index` with one for `node_id`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, node_id: NodeId, token: Token) {
        self.entries[index] = ActiveFormattingElement::Element { node_id, token };
    }

    /// The last element named `name` between the end of the list and the last
    /// marker, with its index and token.
    #[must_use]
    pub fn last_named_after_marker(&self, name: &str) -> Option<(usize, NodeId, &Token)> {
        for (index, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                ActiveFormattingElement::Marker => return None,
                ActiveFormattingElement::Element { node_id, token }
                    if entry.tag_name() == Some(name) =>
                {
                    return Some((index, *node_id, token));
                }
                ActiveFormattingElement::Element { .. } => {}
            }
        }
        None
    }

    /// The token an entry was created from.
    #[must_use]
    pub fn token_for(&self, node_id: NodeId) -> Option<&Token> {
        self.entries.iter().rev().find_map(|entry| match entry {
            ActiveFormattingElement::Element { node_id: id, token } if *id == node_id => {
                Some(token)
            }
            _ => None,
        })
    }

    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// The rewind half of the algorithm: the index of the first entry to
    /// recreate, or `None` when there is nothing to reconstruct.
    ///
    /// STEP 1: "If there are no entries in the list of active formatting
    ///          elements, then there is nothing to reconstruct; stop this
    ///          algorithm."
    /// STEP 2: "If the last (most recently added) entry in the list of active
    ///          formatting elements is a marker, or if it is an element that is
    ///          in the stack of open elements, then there is nothing to
    ///          reconstruct; stop this algorithm."
    /// STEP 4: "Rewind: If there are no entries before entry in the list of
    ///          active formatting elements, then jump to the step labeled
    ///          create."
    /// STEP 5: "Let entry be the entry one earlier than entry in the list of
    ///          active formatting elements."
    /// STEP 6: "If entry is neither a marker nor an element that is also in
    ///          the stack of open elements, go to the step labeled rewind."
    #[must_use]
    pub fn reconstruction_start(&self, stack: &StackOfOpenElements) -> Option<usize> {
        let last = self.entries.last()?;
        match last.node_id() {
            None => return None,
            Some(node_id) if stack.on_stack(node_id) => return None,
            Some(_) => {}
        }

        let ceil = self.entries.len().saturating_sub(FORMATTING_WINDOW);
        let mut index = self.entries.len() - 1;
        loop {
            if index == ceil {
                return Some(index);
            }
            index -= 1;
            match self.entries[index].node_id() {
                None => return Some(index + 1),
                Some(node_id) if stack.on_stack(node_id) => return Some(index + 1),
                Some(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b_token(attributes: &[(&str, &str)]) -> Token {
        Token::StartTag {
            name: "b".to_string(),
            self_closing: false,
            attributes: attributes
                .iter()
                .map(|(name, value)| Attribute::new(*name, *value))
                .collect(),
        }
    }

    #[test]
    fn test_noahs_ark_keeps_three() {
        let mut list = ActiveFormattingElements::new();
        for id in 1..=4 {
            list.push(NodeId(id), b_token(&[("class", "x")]));
        }
        assert_eq!(list.len(), 3);
        assert_eq!(list.position(NodeId(1)), None);
        assert_eq!(list.position(NodeId(2)), Some(0));
    }

    #[test]
    fn test_noahs_ark_ignores_attribute_order() {
        let mut list = ActiveFormattingElements::new();
        list.push(NodeId(1), b_token(&[("a", "1"), ("b", "2")]));
        list.push(NodeId(2), b_token(&[("b", "2"), ("a", "1")]));
        list.push(NodeId(3), b_token(&[("a", "1"), ("b", "2")]));
        list.push(NodeId(4), b_token(&[("b", "2"), ("a", "1")]));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_noahs_ark_stops_at_marker() {
        let mut list = ActiveFormattingElements::new();
        list.push(NodeId(1), b_token(&[]));
        list.push(NodeId(2), b_token(&[]));
        list.insert_marker();
        list.push(NodeId(3), b_token(&[]));
        list.push(NodeId(4), b_token(&[]));
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn test_different_attributes_are_distinct() {
        let mut list = ActiveFormattingElements::new();
        for id in 1..=3 {
            list.push(NodeId(id), b_token(&[]));
        }
        list.push(NodeId(4), b_token(&[("id", "x")]));
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_clear_to_last_marker() {
        let mut list = ActiveFormattingElements::new();
        list.push(NodeId(1), b_token(&[]));
        list.insert_marker();
        list.push(NodeId(2), b_token(&[]));
        list.clear_to_last_marker();
        assert_eq!(list.len(), 1);
        assert!(list.contains(NodeId(1)));
    }

    #[test]
    fn test_last_named_after_marker() {
        let mut list = ActiveFormattingElements::new();
        list.push(NodeId(1), b_token(&[]));
        list.insert_marker();
        assert!(list.last_named_after_marker("b").is_none());
        list.push(NodeId(2), b_token(&[]));
        assert_eq!(
            list.last_named_after_marker("b").map(|(index, id, _)| (index, id)),
            Some((2, NodeId(2)))
        );
    }

    #[test]
    fn test_reconstruction_start() {
        let mut stack = StackOfOpenElements::new();
        stack.push(NodeId(1));
        let mut list = ActiveFormattingElements::new();
        assert_eq!(list.reconstruction_start(&stack), None);

        list.push(NodeId(1), b_token(&[]));
        assert_eq!(list.reconstruction_start(&stack), None);

        list.push(NodeId(2), b_token(&[("id", "i")]));
        list.push(NodeId(3), b_token(&[("id", "u")]));
        assert_eq!(list.reconstruction_start(&stack), Some(1));

        list.insert_marker();
        assert_eq!(list.reconstruction_start(&stack), None);
    }

    #[test]
    fn test_reconstruction_is_windowed() {
        let stack = StackOfOpenElements::new();
        let mut list = ActiveFormattingElements::new();
        for id in 0..20 {
            let n = id.to_string();
            list.push(NodeId(id), b_token(&[("n", n.as_str())]));
        }
        assert_eq!(list.reconstruction_start(&stack), Some(20 - FORMATTING_WINDOW));
    }
}
