//! [§ 13.2.6.4.7 The adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
//!
//! Repairs misnested formatting end tags such as `<b>1<p>2</b>3</p>`.

use log::trace;

use super::core::HTMLParser;
use super::tags::is_special;
use crate::tokenizer::{Token, TokenSource};

/// "Let outer loop counter be 0 ... If outer loop counter is greater than or
/// equal to 8, then return."
const OUTER_LOOP_LIMIT: usize = 8;

/// "If inner loop counter is greater than 3 and node is in the list of active
/// formatting elements, then remove node from the list of active formatting
/// elements."
const INNER_LOOP_LIMIT: usize = 3;

impl<S: TokenSource> HTMLParser<S> {
    /// Run the adoption agency algorithm for the end tag `token`.
    ///
    /// Returns `false` when the caller should "act as described in the 'any
    /// other end tag' entry".
    pub(super) fn run_adoption_agency(&mut self, token: &Token) -> bool {
        let Some(subject) = token.tag_name() else {
            return true;
        };

        // STEP 2: "If the current node is an HTML element whose tag name is
        //          subject, and the current node is not in the list of active
        //          formatting elements, then pop the current node off the stack
        //          of open elements and return."
        if let Some(current) = self.current_node()
            && self.html_tag_name(current) == Some(subject)
            && !self.active_formatting_elements.contains(current)
        {
            self.pop_current_node();
            return true;
        }

        // STEP 3-4: Outer loop.
        for _ in 0..OUTER_LOOP_LIMIT {
            // "Let formatting element be the last element in the list of active
            //  formatting elements that is between the end of the list and the
            //  last marker in the list, if any, or the start of the list
            //  otherwise, and has the tag name subject."
            // "If there is no such element, then return and instead act as
            //  described in the "any other end tag" entry above."
            let Some(formatting_element) = self
                .active_formatting_elements
                .last_named_after_marker(subject)
                .map(|(_, node, _)| node)
            else {
                return false;
            };

            // "If formatting element is not in the stack of open elements, then
            //  this is a parse error; remove the element from the list, and
            //  return."
            if !self.stack_of_open_elements.on_stack(formatting_element) {
                self.parse_error(token);
                let _ = self.active_formatting_elements.remove(formatting_element);
                return true;
            }

            // "If formatting element is in the stack of open elements, but the
            //  element is not in scope, then this is a parse error; return."
            if !self
                .stack_of_open_elements
                .node_in_scope(&self.tree, formatting_element)
            {
                self.parse_error(token);
                return true;
            }

            // "If formatting element is not the current node, this is a parse
            //  error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.parse_error(token);
            }

            // "Let furthest block be the topmost node in the stack of open
            //  elements that is lower in the stack than formatting element, and
            //  is an element in the special category."
            let Some(position) = self.stack_of_open_elements.position(formatting_element) else {
                return true;
            };
            let furthest_block = self
                .stack_of_open_elements
                .iter()
                .skip(position + 1)
                .find(|&id| self.element(id).is_some_and(is_special));

            // "If there is no furthest block, then the UA must first pop all
            //  the nodes from the bottom of the stack of open elements, from
            //  the current node up to and including formatting element, then
            //  remove formatting element from the list of active formatting
            //  elements, and finally return."
            let Some(furthest_block) = furthest_block else {
                self.stack_of_open_elements
                    .pop_until_node(formatting_element);
                let _ = self.active_formatting_elements.remove(formatting_element);
                return true;
            };

            trace!(target: "weft::parser", "adoption agency: </{subject}> with furthest block {furthest_block:?}");

            // "Let common ancestor be the element immediately above formatting
            //  element in the stack of open elements."
            let Some(common_ancestor) = self.stack_of_open_elements.above(formatting_element)
            else {
                return true;
            };

            // "Let a bookmark note the position of formatting element in the
            //  list of active formatting elements relative to the elements on
            //  either side of it in the list."
            let Some(mut bookmark) = self.active_formatting_elements.position(formatting_element)
            else {
                return true;
            };

            // "Let node and last node be furthest block."
            let mut last_node = furthest_block;
            let mut next_above = self.stack_of_open_elements.above(furthest_block);
            let mut inner_loop_counter = 0;

            // Inner loop.
            loop {
                inner_loop_counter += 1;

                // "Let node be the element immediately above node in the stack
                //  of open elements, or if node is no longer in the stack of
                //  open elements, the element that was immediately above node
                //  in the stack of open elements before node was removed."
                let Some(mut node) = next_above else {
                    break;
                };

                // "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }
                next_above = self.stack_of_open_elements.above(node);

                if inner_loop_counter > INNER_LOOP_LIMIT
                    && let Some(index) = self.active_formatting_elements.remove(node)
                    && index < bookmark
                {
                    bookmark -= 1;
                }

                // "If node is not in the list of active formatting elements,
                //  then remove node from the stack of open elements and
                //  continue."
                let Some(node_token) = self.active_formatting_elements.token_for(node).cloned()
                else {
                    let _ = self.stack_of_open_elements.remove(node);
                    continue;
                };

                // "Create an element for the token for which the element node
                //  was created, in the HTML namespace, with common ancestor as
                //  the intended parent; replace the entry for node in the list
                //  of active formatting elements with an entry for the new
                //  element, replace the entry for node in the stack of open
                //  elements with an entry for the new element, and let node be
                //  the new element."
                let replacement = self.recreate_element(&node_token);
                self.active_formatting_elements
                    .replace(node, replacement, node_token);
                self.stack_of_open_elements.replace(node, replacement);
                node = replacement;

                // "If last node is furthest block, then move the aforementioned
                //  bookmark to be immediately after the new node in the list of
                //  active formatting elements."
                if last_node == furthest_block
                    && let Some(index) = self.active_formatting_elements.position(node)
                {
                    bookmark = index + 1;
                }

                // "Append last node to node."
                self.tree.append_child(node, last_node);

                // "Set last node to node."
                last_node = node;
            }

            // "Insert whatever last node ended up being in the appropriate
            //  place for inserting a node, but using common ancestor as the
            //  override target."
            self.tree.detach(last_node);
            self.insert_node_with_override(last_node, common_ancestor);

            // "Create an element for the token for which formatting element was
            //  created, in the HTML namespace, with furthest block as the
            //  intended parent."
            let Some(formatting_token) = self
                .active_formatting_elements
                .token_for(formatting_element)
                .cloned()
            else {
                return true;
            };
            let new_element = self.recreate_element(&formatting_token);

            // "Take all of the child nodes of furthest block and append them to
            //  the element created in the last step."
            self.tree.move_children(furthest_block, new_element);

            // "Append that new element to furthest block."
            self.tree.append_child(furthest_block, new_element);

            // "Remove formatting element from the list of active formatting
            //  elements, and insert the new element into the list of active
            //  formatting elements at the position of the aforementioned
            //  bookmark."
            if let Some(index) = self.active_formatting_elements.remove(formatting_element)
                && index < bookmark
            {
                bookmark -= 1;
            }
            self.active_formatting_elements
                .insert_at(bookmark, new_element, formatting_token);

            // "Remove formatting element from the stack of open elements, and
            //  insert the new element into the stack of open elements
            //  immediately below the position of furthest block in that stack."
            let _ = self.stack_of_open_elements.remove(formatting_element);
            self.stack_of_open_elements
                .insert_after(furthest_block, new_element);
        }
        true
    }
}
