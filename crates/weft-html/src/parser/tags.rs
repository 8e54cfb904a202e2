//! Element categories consulted by tree construction.
//!
//! [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//!
//! "The elements in the stack of open elements fall into the following
//! categories: Special, Formatting, Ordinary."

use weft_dom::{ElementData, Namespace};

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
///
/// "while the current node is a dd element, a dt element, an li element, an
/// optgroup element, an option element, a p element, an rb element, an rp
/// element, an rt element, or an rtc element"
pub(crate) const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// "generate all implied end tags thoroughly" adds the table structure.
pub(crate) const THOROUGH_IMPLIED_END_TAGS: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Start tags in "in body" that close a `p` in button scope and insert a
/// plain block element.
pub(crate) const BLOCK_START_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu",
    "nav", "ol", "p", "search", "section", "summary", "ul",
];

/// End tags in "in body" closed by the generic in-scope rule.
pub(crate) const BLOCK_END_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog", "dir",
    "div", "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "listing",
    "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul",
];

/// "h1", "h2", "h3", "h4", "h5", "h6"
pub(crate) const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#formatting)
///
/// "The elements in the formatting category are: a, b, big, code, em, font,
/// i, nobr, s, small, strike, strong, tt, u."
pub(crate) const FORMATTING_ELEMENTS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// HTML-namespace members of the special category.
const SPECIAL_HTML_ELEMENTS: &[&str] = &[
    "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound", "blockquote",
    "body", "br", "button", "caption", "center", "col", "colgroup", "dd", "details", "dir", "div",
    "dl", "dt", "embed", "fieldset", "figcaption", "figure", "footer", "form", "frame",
    "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html",
    "iframe", "img", "input", "keygen", "li", "link", "listing", "main", "marquee", "menu",
    "meta", "nav", "noembed", "noframes", "noscript", "object", "ol", "p", "param", "plaintext",
    "pre", "script", "search", "section", "select", "source", "style", "summary", "table",
    "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "title", "tr", "track", "ul",
    "wbr", "xmp",
];

/// Tag names this parser knows as HTML elements. Self-closing one of these
/// when it is not void is a parse error; unknown names self-close silently.
const KNOWN_HTML_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "address", "applet", "area", "article", "aside", "audio", "b",
    "base", "basefont", "bdi", "bdo", "bgsound", "big", "blink", "blockquote", "body", "br",
    "button", "canvas", "caption", "center", "cite", "code", "col", "colgroup", "command",
    "data", "datalist", "dd", "del", "details", "device", "dfn", "dialog", "dir", "div", "dl",
    "dt", "em", "embed", "fieldset", "figcaption", "figure", "font", "footer", "form", "frame",
    "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr", "html",
    "i", "iframe", "img", "input", "ins", "isindex", "kbd", "keygen", "label", "legend", "li",
    "link", "listing", "main", "map", "mark", "marquee", "math", "menu", "menuitem", "meta",
    "meter", "nav", "nobr", "noembed", "noframes", "noscript", "object", "ol", "optgroup",
    "option", "output", "p", "param", "picture", "plaintext", "pre", "progress", "q", "rb",
    "rp", "rt", "rtc", "ruby", "s", "samp", "script", "search", "section", "select", "slot",
    "small", "source", "span", "strike", "strong", "style", "sub", "summary", "sup", "svg",
    "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "time", "title",
    "tr", "track", "tt", "u", "ul", "var", "video", "wbr", "xmp",
];

/// [§ 4.10.2 Categories](https://html.spec.whatwg.org/multipage/forms.html#category-listed)
///
/// "Listed elements: button, fieldset, input, object, output, select,
/// textarea, form-associated custom elements" (plus the legacy `keygen`).
const FORM_LISTED_ELEMENTS: &[&str] = &[
    "button", "fieldset", "input", "keygen", "object", "output", "select", "textarea",
];

/// Elements the engine never treats as closable by the end of the body
/// without a parse error.
pub(crate) const END_OF_BODY_ALLOWED: &[&str] = &[
    "body", "dd", "dt", "html", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// Also "MathML mi, MathML mo, MathML mn, MathML ms, MathML mtext, and MathML
/// annotation-xml; and SVG foreignObject, SVG desc, and SVG title."
pub(crate) fn is_special(element: &ElementData) -> bool {
    let name = element.tag_name.as_str();
    match element.namespace {
        Namespace::Html => SPECIAL_HTML_ELEMENTS.contains(&name),
        Namespace::MathMl => matches!(name, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"),
        Namespace::Svg => matches!(name, "foreignObject" | "desc" | "title"),
    }
}

pub(crate) fn is_formatting(name: &str) -> bool {
    FORMATTING_ELEMENTS.contains(&name)
}

pub(crate) fn is_known_tag(name: &str) -> bool {
    KNOWN_HTML_ELEMENTS.contains(&name)
}

pub(crate) fn is_form_listed(name: &str) -> bool {
    FORM_LISTED_ELEMENTS.contains(&name)
}

/// Text inserted into these elements is kept as raw data rather than text.
pub(crate) fn is_data_content(name: &str) -> bool {
    matches!(name, "script" | "style")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_respects_namespace() {
        let title = ElementData::html("title", Vec::new());
        assert!(is_special(&title));

        let svg_title = ElementData {
            tag_name: "title".to_string(),
            namespace: Namespace::Svg,
            attrs: Vec::new(),
            self_closing: false,
        };
        assert!(is_special(&svg_title));

        let math_div = ElementData {
            tag_name: "div".to_string(),
            namespace: Namespace::MathMl,
            attrs: Vec::new(),
            self_closing: false,
        };
        assert!(!is_special(&math_div));
    }

    #[test]
    fn test_known_tags() {
        assert!(is_known_tag("div"));
        assert!(is_known_tag("script"));
        assert!(!is_known_tag("foo"));
    }
}
