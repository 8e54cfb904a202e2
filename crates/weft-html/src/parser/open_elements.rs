//! [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//!
//! "Initially, the stack of open elements is empty. The stack grows downwards;
//! the topmost node on the stack is the first one added to the stack, and the
//! bottommost node of the stack is the most recently added node in the stack."
//!
//! The stack holds `NodeId`s only; the `DomTree` owns the elements. Every
//! backward search is capped so pathological nesting stays linear: scope
//! checks look at most [`MAX_SCOPE_SEARCH_DEPTH`] entries past the current
//! node and name/identity lookups at most [`MAX_QUEUE_DEPTH`]. A match
//! deeper than the cap is reported as absent.

use weft_dom::{DomTree, ElementData, Namespace, NodeId};

use super::tags::{IMPLIED_END_TAGS, THOROUGH_IMPLIED_END_TAGS};

/// How far past the current node scope queries look.
pub const MAX_SCOPE_SEARCH_DEPTH: usize = 100;

/// How far past the current node name and identity lookups look.
pub const MAX_QUEUE_DEPTH: usize = 256;

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
///
/// "applet, caption, html, table, td, th, marquee, object, template"
const DEFAULT_SCOPE: &[&str] = &[
    "applet", "caption", "html", "marquee", "object", "table", "td", "template", "th",
];

/// "has an element in list item scope": the default scope plus "ol" and "ul".
const LIST_ITEM_SCOPE_EXTRAS: &[&str] = &["ol", "ul"];

/// "has an element in button scope": the default scope plus "button".
const BUTTON_SCOPE_EXTRAS: &[&str] = &["button"];

/// "has an element in table scope": "html, table, template"
const TABLE_SCOPE: &[&str] = &["html", "table", "template"];

/// "has an element in select scope": every element except "optgroup" and
/// "option" is a boundary.
const SELECT_SCOPE_ALLOWED: &[&str] = &["optgroup", "option"];

fn element(tree: &DomTree, id: NodeId) -> Option<&ElementData> {
    tree.as_element(id)
}

/// Local name of `id` if it is an HTML element.
fn html_name(tree: &DomTree, id: NodeId) -> Option<&str> {
    element(tree, id)
        .filter(|e| e.is_html())
        .map(|e| e.tag_name.as_str())
}

/// The MathML and SVG members of the default scope boundary.
fn is_foreign_scope_boundary(element: &ElementData) -> bool {
    match element.namespace {
        Namespace::MathMl => matches!(
            element.tag_name.as_str(),
            "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"
        ),
        Namespace::Svg => matches!(
            element.tag_name.as_str(),
            "foreignObject" | "desc" | "title"
        ),
        Namespace::Html => false,
    }
}

/// Which boundary set a scope query uses.
#[derive(Debug, Clone, Copy)]
enum Scope {
    Default,
    ListItem,
    Button,
    Table,
}

impl Scope {
    fn is_boundary(self, element: &ElementData) -> bool {
        let name = element.tag_name.as_str();
        match self {
            Self::Table => element.is_html() && TABLE_SCOPE.contains(&name),
            Self::Default | Self::ListItem | Self::Button => {
                if !element.is_html() {
                    return is_foreign_scope_boundary(element);
                }
                DEFAULT_SCOPE.contains(&name)
                    || match self {
                        Self::ListItem => LIST_ITEM_SCOPE_EXTRAS.contains(&name),
                        Self::Button => BUTTON_SCOPE_EXTRAS.contains(&name),
                        _ => false,
                    }
            }
        }
    }
}

/// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
#[derive(Debug, Default, Clone)]
pub struct StackOfOpenElements {
    elements: Vec<NodeId>,
}

impl StackOfOpenElements {
    /// An empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Number of open elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when nothing is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// "The current node is the bottommost node in this stack of open elements."
    #[must_use]
    pub fn current(&self) -> Option<NodeId> {
        self.elements.last().copied()
    }

    /// The topmost node (the `html` element in a document).
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.elements.first().copied()
    }

    /// The entry at `index`, counted from the top of the stack.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.elements.get(index).copied()
    }

    /// Entries from the top of the stack (oldest) to the current node.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.elements.iter().copied()
    }

    /// Push `node` as the new current node.
    pub fn push(&mut self, node: NodeId) {
        self.elements.push(node);
    }

    /// Pop the current node.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.elements.pop()
    }

    /// Index of `node` in the stack, searching the whole stack.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.elements.iter().rposition(|&id| id == node)
    }

    /// Whether `node` is on the stack within [`MAX_QUEUE_DEPTH`] of the
    /// current node.
    #[must_use]
    pub fn on_stack(&self, node: NodeId) -> bool {
        self.elements
            .iter()
            .rev()
            .take(MAX_QUEUE_DEPTH + 1)
            .any(|&id| id == node)
    }

    /// Nearest HTML element named `name`, within [`MAX_QUEUE_DEPTH`] of the
    /// current node.
    #[must_use]
    pub fn get_from_stack(&self, tree: &DomTree, name: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .rev()
            .take(MAX_QUEUE_DEPTH + 1)
            .copied()
            .find(|&id| html_name(tree, id) == Some(name))
    }

    /// Whether an HTML element named `name` is open.
    #[must_use]
    pub fn contains_named(&self, tree: &DomTree, name: &str) -> bool {
        self.get_from_stack(tree, name).is_some()
    }

    /// Whether any open element is not one of `allowed`, within
    /// [`MAX_SCOPE_SEARCH_DEPTH`] of the current node.
    #[must_use]
    pub fn on_stack_not(&self, tree: &DomTree, allowed: &[&str]) -> bool {
        self.elements
            .iter()
            .rev()
            .take(MAX_SCOPE_SEARCH_DEPTH + 1)
            .filter_map(|&id| element(tree, id))
            .any(|e| !allowed.contains(&e.tag_name.as_str()))
    }

    /// Remove `node` wherever it is. Returns false if it was not open.
    pub fn remove(&mut self, node: NodeId) -> bool {
        match self.position(node) {
            Some(index) => {
                let _ = self.elements.remove(index);
                true
            }
            None => false,
        }
    }

    /// The entry immediately above `node` (closer to the top).
    #[must_use]
    pub fn above(&self, node: NodeId) -> Option<NodeId> {
        let index = self.position(node)?;
        index.checked_sub(1).map(|above| self.elements[above])
    }

    /// Insert `node` immediately below `after`.
    ///
    /// # Panics
    ///
    /// Panics if `after` is not on the stack.
    pub fn insert_after(&mut self, after: NodeId, node: NodeId) {
        let Some(index) = self.position(after) else {
            panic!("insert_after: {after:?} is not on the stack of open elements");
        };
        self.elements.insert(index + 1, node);
    }

    /// Replace `out` with `replacement` in place.
    ///
    /// # Panics
    ///
    /// Panics if `out` is not on the stack.
    pub fn replace(&mut self, out: NodeId, replacement: NodeId) {
        let Some(index) = self.position(out) else {
            panic!("replace: {out:?} is not on the stack of open elements");
        };
        self.elements[index] = replacement;
    }

    /// Pop until an HTML element named `name` has been popped. Returns that
    /// element, or `None` if the stack emptied first.
    pub fn pop_until(&mut self, tree: &DomTree, name: &str) -> Option<NodeId> {
        while let Some(id) = self.elements.pop() {
            if html_name(tree, id) == Some(name) {
                return Some(id);
            }
        }
        None
    }

    /// Pop until an element named `name` in any namespace has been popped.
    pub fn pop_until_any_namespace(&mut self, tree: &DomTree, name: &str) -> Option<NodeId> {
        while let Some(id) = self.elements.pop() {
            if element(tree, id).is_some_and(|e| e.tag_name == name) {
                return Some(id);
            }
        }
        None
    }

    /// Pop until an HTML element named one of `names` has been popped.
    pub fn pop_until_one_of(&mut self, tree: &DomTree, names: &[&str]) -> Option<NodeId> {
        while let Some(id) = self.elements.pop() {
            if html_name(tree, id).is_some_and(|n| names.contains(&n)) {
                return Some(id);
            }
        }
        None
    }

    /// Pop until `node` itself has been popped.
    pub fn pop_until_node(&mut self, node: NodeId) {
        while let Some(id) = self.elements.pop() {
            if id == node {
                break;
            }
        }
    }

    /// Pop while the current node is not an HTML element in `names` or `html`.
    fn clear_to_context(&mut self, tree: &DomTree, names: &[&str]) {
        while let Some(current) = self.current() {
            if html_name(tree, current).is_some_and(|n| n == "html" || names.contains(&n)) {
                break;
            }
            let _ = self.elements.pop();
        }
    }

    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    ///
    /// "while the current node is not a table, template, or html element, pop
    /// elements from the stack of open elements."
    pub fn clear_to_table_context(&mut self, tree: &DomTree) {
        self.clear_to_context(tree, &["table", "template"]);
    }

    /// [§ 13.2.6.4.13](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-body-context)
    ///
    /// "while the current node is not a tbody, tfoot, thead, template, or html
    /// element, pop elements from the stack of open elements."
    pub fn clear_to_table_body_context(&mut self, tree: &DomTree) {
        self.clear_to_context(tree, &["tbody", "tfoot", "thead", "template"]);
    }

    /// [§ 13.2.6.4.14](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-row-context)
    ///
    /// "while the current node is not a tr, template, or html element, pop
    /// elements from the stack of open elements."
    pub fn clear_to_table_row_context(&mut self, tree: &DomTree) {
        self.clear_to_context(tree, &["tr", "template"]);
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// STEP 1: "Initialize node to be the current node (the bottommost node of
    ///          the stack)."
    /// STEP 2: "If node is the target node, terminate in a match state."
    /// STEP 3: "Otherwise, if node is one of the element types in list,
    ///          terminate in a failure state."
    /// STEP 4: "Otherwise, set node to the previous entry in the stack of open
    ///          elements and return to step 2."
    fn in_specific_scope(&self, tree: &DomTree, targets: &[&str], scope: Scope) -> bool {
        for &id in self.elements.iter().rev().take(MAX_SCOPE_SEARCH_DEPTH + 1) {
            let Some(element) = element(tree, id) else {
                continue;
            };
            if element.is_html() && targets.contains(&element.tag_name.as_str()) {
                return true;
            }
            if scope.is_boundary(element) {
                return false;
            }
        }
        false
    }

    /// Whether `node` itself is in scope, for algorithms that track a
    /// specific element rather than a tag name.
    #[must_use]
    pub fn node_in_scope(&self, tree: &DomTree, node: NodeId) -> bool {
        for &id in self.elements.iter().rev().take(MAX_SCOPE_SEARCH_DEPTH + 1) {
            if id == node {
                return true;
            }
            if element(tree, id).is_some_and(|e| Scope::Default.is_boundary(e)) {
                return false;
            }
        }
        false
    }

    /// "has an element in scope"
    #[must_use]
    pub fn in_scope(&self, tree: &DomTree, name: &str) -> bool {
        self.in_specific_scope(tree, &[name], Scope::Default)
    }

    /// "has an element in scope" for any of `names`.
    #[must_use]
    pub fn in_scope_any(&self, tree: &DomTree, names: &[&str]) -> bool {
        self.in_specific_scope(tree, names, Scope::Default)
    }

    /// "has an element in list item scope"
    #[must_use]
    pub fn in_list_item_scope(&self, tree: &DomTree, name: &str) -> bool {
        self.in_specific_scope(tree, &[name], Scope::ListItem)
    }

    /// "has an element in button scope"
    #[must_use]
    pub fn in_button_scope(&self, tree: &DomTree, name: &str) -> bool {
        self.in_specific_scope(tree, &[name], Scope::Button)
    }

    /// "has an element in table scope"
    #[must_use]
    pub fn in_table_scope(&self, tree: &DomTree, name: &str) -> bool {
        self.in_specific_scope(tree, &[name], Scope::Table)
    }

    /// "has an element in table scope" for any of `names`.
    #[must_use]
    pub fn in_table_scope_any(&self, tree: &DomTree, names: &[&str]) -> bool {
        self.in_specific_scope(tree, names, Scope::Table)
    }

    /// "has an element in select scope"
    ///
    /// Every element other than `optgroup` and `option` is a boundary, so the
    /// walk stops at the first one. Names are compared without regard to
    /// namespace.
    #[must_use]
    pub fn in_select_scope(&self, tree: &DomTree, name: &str) -> bool {
        for &id in self.elements.iter().rev().take(MAX_SCOPE_SEARCH_DEPTH + 1) {
            let Some(element) = element(tree, id) else {
                continue;
            };
            let element_name = element.tag_name.as_str();
            if element_name == name {
                return true;
            }
            if !SELECT_SCOPE_ALLOWED.contains(&element_name) {
                return false;
            }
        }
        false
    }

    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "If a step requires the UA to generate implied end tags but lists an
    /// element to exclude from the process, then the UA must perform the above
    /// steps as if that element was not in the above list."
    pub fn generate_implied_end_tags(&mut self, tree: &DomTree, exclude: Option<&str>) {
        while let Some(current) = self.current() {
            match html_name(tree, current) {
                Some(name) if IMPLIED_END_TAGS.contains(&name) && exclude != Some(name) => {
                    let _ = self.elements.pop();
                }
                _ => break,
            }
        }
    }

    /// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
    ///
    /// "generate all implied end tags thoroughly"
    pub fn generate_all_implied_end_tags_thoroughly(&mut self, tree: &DomTree) {
        while let Some(current) = self.current() {
            match html_name(tree, current) {
                Some(name) if THOROUGH_IMPLIED_END_TAGS.contains(&name) => {
                    let _ = self.elements.pop();
                }
                _ => break,
            }
        }
    }

    /// Whether the current node is an HTML element named `name`.
    #[must_use]
    pub fn current_is(&self, tree: &DomTree, name: &str) -> bool {
        self.current()
            .is_some_and(|id| html_name(tree, id) == Some(name))
    }

    /// Whether the current node is an HTML element named one of `names`.
    #[must_use]
    pub fn current_is_one_of(&self, tree: &DomTree, names: &[&str]) -> bool {
        self.current()
            .and_then(|id| html_name(tree, id))
            .is_some_and(|n| names.contains(&n))
    }
}

#[cfg(test)]
mod tests {
    use weft_dom::NodeType;

    use super::*;

    fn html(tree: &mut DomTree, name: &str) -> NodeId {
        tree.alloc(NodeType::Element(ElementData::html(name, Vec::new())))
    }

    fn foreign(tree: &mut DomTree, name: &str, namespace: Namespace) -> NodeId {
        tree.alloc(NodeType::Element(ElementData {
            tag_name: name.to_string(),
            namespace,
            attrs: Vec::new(),
            self_closing: false,
        }))
    }

    fn stack_of(tree: &mut DomTree, names: &[&str]) -> StackOfOpenElements {
        let mut stack = StackOfOpenElements::new();
        for name in names {
            let id = html(tree, name);
            stack.push(id);
        }
        stack
    }

    #[test]
    fn test_in_scope_stops_at_boundary() {
        let mut tree = DomTree::new();
        let stack = stack_of(&mut tree, &["html", "body", "p", "table", "tr", "td", "span"]);
        assert!(stack.in_scope(&tree, "span"));
        assert!(stack.in_scope(&tree, "td"));
        assert!(!stack.in_scope(&tree, "p"));
        assert!(stack.in_table_scope(&tree, "tr"));
        assert!(!stack.in_table_scope(&tree, "body"));
    }

    #[test]
    fn test_button_scope() {
        let mut tree = DomTree::new();
        let stack = stack_of(&mut tree, &["html", "body", "p", "button"]);
        assert!(!stack.in_button_scope(&tree, "p"));
        assert!(stack.in_scope(&tree, "p"));
    }

    #[test]
    fn test_list_item_scope() {
        let mut tree = DomTree::new();
        let stack = stack_of(&mut tree, &["html", "body", "li", "ul"]);
        assert!(!stack.in_list_item_scope(&tree, "li"));
        assert!(stack.in_scope(&tree, "li"));
    }

    #[test]
    fn test_foreign_boundary_blocks_default_scope() {
        let mut tree = DomTree::new();
        let mut stack = stack_of(&mut tree, &["html", "body", "p"]);
        let svg = foreign(&mut tree, "svg", Namespace::Svg);
        let object = foreign(&mut tree, "foreignObject", Namespace::Svg);
        stack.push(svg);
        stack.push(object);
        assert!(!stack.in_scope(&tree, "p"));
        assert!(!stack.in_button_scope(&tree, "p"));
    }

    #[test]
    fn test_select_scope_rejects_other_elements() {
        let mut tree = DomTree::new();
        let stack = stack_of(&mut tree, &["html", "body", "select", "optgroup", "option"]);
        assert!(stack.in_select_scope(&tree, "select"));

        let stack = stack_of(&mut tree, &["html", "body", "select", "div", "option"]);
        assert!(!stack.in_select_scope(&tree, "select"));
    }

    #[test]
    fn test_scope_search_is_bounded() {
        let mut tree = DomTree::new();
        let mut stack = stack_of(&mut tree, &["html", "body", "p"]);
        for _ in 0..MAX_SCOPE_SEARCH_DEPTH + 1 {
            let span = html(&mut tree, "span");
            stack.push(span);
        }
        assert!(!stack.in_button_scope(&tree, "p"));
        assert!(stack.contains_named(&tree, "p"));
    }

    #[test]
    fn test_clear_to_table_context_stops_at_html() {
        let mut tree = DomTree::new();
        let mut stack = stack_of(&mut tree, &["html", "div", "span"]);
        stack.clear_to_table_context(&tree);
        assert_eq!(stack.len(), 1);
        assert!(stack.current_is(&tree, "html"));
    }

    #[test]
    fn test_implied_end_tags_with_exclusion() {
        let mut tree = DomTree::new();
        let mut stack = stack_of(&mut tree, &["html", "body", "li", "p", "option"]);
        stack.generate_implied_end_tags(&tree, Some("li"));
        assert!(stack.current_is(&tree, "li"));
        stack.generate_implied_end_tags(&tree, None);
        assert!(stack.current_is(&tree, "body"));
    }

    #[test]
    fn test_identity_operations() {
        let mut tree = DomTree::new();
        let mut stack = stack_of(&mut tree, &["html", "body"]);
        let body = stack.current().unwrap();
        let div = html(&mut tree, "div");
        let span = html(&mut tree, "span");
        stack.insert_after(body, div);
        assert_eq!(stack.above(div), Some(body));
        stack.replace(div, span);
        assert!(!stack.on_stack(div));
        assert!(stack.on_stack(span));
        assert!(stack.remove(span));
        assert!(!stack.remove(span));
        let html_root = stack.first();
        assert_eq!(stack.pop_until(&tree, "html"), html_root);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_until_any_namespace() {
        let mut tree = DomTree::new();
        let mut stack = stack_of(&mut tree, &["html", "body"]);
        let svg_title = foreign(&mut tree, "title", Namespace::Svg);
        let g = foreign(&mut tree, "g", Namespace::Svg);
        stack.push(svg_title);
        stack.push(g);

        assert_eq!(stack.pop_until(&tree, "title"), None);

        let mut stack = stack_of(&mut tree, &["html", "body"]);
        stack.push(svg_title);
        stack.push(g);
        assert_eq!(stack.pop_until_any_namespace(&tree, "title"), Some(svg_title));
        assert_eq!(stack.len(), 2);
    }
}
