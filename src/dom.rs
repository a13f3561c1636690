use usvg::roxmltree;

use crate::error::{AnimsvgError, AnimsvgResult};

/// Tags the animation families target, in the order renderers visit them.
pub const ANIMATED_TAGS: &[&str] = &[
    "path", "text", "circle", "rect", "line", "polygon", "polyline",
];

/// SMIL annotation children attached by the native renderer.
pub const SMIL_TAGS: &[&str] = &["animate", "animateTransform"];

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// An ordered SVG element tree.
///
/// Unlike a full DOM this holds only what the synthesis pipeline needs:
/// element names, attributes in document order, child elements and text.
/// Comments and processing instructions are dropped at parse time.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Document {
    /// Parse raw SVG text. The root element must be `<svg>`.
    pub fn parse(text: &str) -> AnimsvgResult<Self> {
        let xml = roxmltree::Document::parse(text)
            .map_err(|e| AnimsvgError::input(format!("failed to parse svg: {e}")))?;
        let root = xml.root_element();
        if !root.tag_name().name().eq_ignore_ascii_case("svg") {
            return Err(AnimsvgError::input(format!(
                "root element is <{}>, expected <svg>",
                root.tag_name().name()
            )));
        }
        Ok(Self {
            root: convert_element(root, true),
        })
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        write_element(&self.root, &mut out);
        out
    }

    /// Number of descendant elements whose tag is in `tags`, document order.
    pub fn count_tags(&self, tags: &[&str]) -> usize {
        fn walk(el: &Element, tags: &[&str], n: &mut usize) {
            for child in &el.children {
                if let Node::Element(e) = child {
                    if tags.contains(&e.name.as_str()) {
                        *n += 1;
                    }
                    walk(e, tags, n);
                }
            }
        }
        let mut n = 0;
        walk(&self.root, tags, &mut n);
        n
    }

    /// Visit every descendant element whose tag is in `tags`, in document
    /// order, passing its running index.
    pub fn visit_tags_mut(&mut self, tags: &[&str], f: &mut impl FnMut(usize, &mut Element)) {
        fn walk(
            el: &mut Element,
            tags: &[&str],
            counter: &mut usize,
            f: &mut impl FnMut(usize, &mut Element),
        ) {
            for child in &mut el.children {
                if let Node::Element(e) = child {
                    if tags.contains(&e.name.as_str()) {
                        f(*counter, e);
                        *counter += 1;
                    }
                    walk(e, tags, counter, f);
                }
            }
        }
        let mut counter = 0;
        walk(&mut self.root, tags, &mut counter, f);
    }

    /// Visit every descendant element (any tag), pre-order.
    pub fn visit_elements_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        fn walk(el: &mut Element, f: &mut impl FnMut(&mut Element)) {
            for child in &mut el.children {
                if let Node::Element(e) = child {
                    f(e);
                    walk(e, f);
                }
            }
        }
        walk(&mut self.root, f);
    }

    /// Drop every descendant element for which `keep` returns false,
    /// subtree included.
    pub fn retain_elements(&mut self, keep: &impl Fn(&Element) -> bool) {
        fn walk(el: &mut Element, keep: &impl Fn(&Element) -> bool) {
            el.children.retain(|n| match n {
                Node::Element(e) => keep(e),
                Node::Text(_) => true,
            });
            for child in &mut el.children {
                if let Node::Element(e) = child {
                    walk(e, keep);
                }
            }
        }
        walk(&mut self.root, keep);
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Numeric attribute with the geometry default: missing or malformed
    /// values read as 0.
    pub fn num_attr(&self, name: &str) -> f64 {
        self.attr(name)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| k != name);
    }

    /// Append a class token, preserving any existing ones.
    pub fn add_class(&mut self, class: &str) {
        match self.attr("class") {
            Some(existing) if existing.split_whitespace().any(|c| c == class) => {}
            Some(existing) => {
                let merged = format!("{existing} {class}");
                self.set_attr("class", merged);
            }
            None => self.set_attr("class", class),
        }
    }

    /// Append an inline style declaration, preserving any existing ones.
    pub fn append_style_property(&mut self, name: &str, value: &str) {
        let decl = format!("{name}: {value};");
        match self.attr("style") {
            Some(existing) => {
                let merged = format!("{existing} {decl}");
                self.set_attr("style", merged);
            }
            None => self.set_attr("style", decl),
        }
    }

    pub fn append_child(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Drop child elements whose tag is in `tags` (direct children only).
    pub fn remove_child_tags(&mut self, tags: &[&str]) {
        self.children.retain(|n| match n {
            Node::Element(e) => !tags.contains(&e.name.as_str()),
            Node::Text(_) => true,
        });
    }
}

fn convert_element(node: roxmltree::Node, is_root: bool) -> Element {
    let mut el = Element::new(node.tag_name().name());

    if is_root {
        // roxmltree resolves xmlns declarations out of the attribute list;
        // re-emit the in-scope ones so the serialized document stands alone.
        for ns in node.namespaces() {
            let name = match ns.name() {
                Some(prefix) => format!("xmlns:{prefix}"),
                None => "xmlns".to_string(),
            };
            el.attrs.push((name, ns.uri().to_string()));
        }
    }

    for attr in node.attributes() {
        let name = if attr.namespace() == Some(XLINK_NS) {
            format!("xlink:{}", attr.name())
        } else {
            attr.name().to_string()
        };
        el.attrs.push((name, attr.value().to_string()));
    }

    for child in node.children() {
        if child.is_element() {
            el.children
                .push(Node::Element(convert_element(child, false)));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                el.children.push(Node::Text(text.to_string()));
            }
        }
    }

    el
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for (k, v) in &el.attrs {
        out.push(' ');
        out.push_str(k);
        out.push_str("=\"");
        escape_into(v, out, true);
        out.push('"');
    }
    if el.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &el.children {
        match child {
            Node::Element(e) => write_element(e, out),
            Node::Text(t) => escape_into(t, out, false),
        }
    }
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

fn escape_into(s: &str, out: &mut String, in_attr: bool) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
