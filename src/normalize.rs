use crate::dom::{Document, Element, Node};

/// Attribute names that encode shape geometry. They are consumed by the
/// path conversion and must not be copied onto the replacement element.
const GEOMETRY_ATTRS: &[&str] = &[
    "x", "y", "x1", "y1", "x2", "y2", "width", "height", "cx", "cy", "r", "points",
];

/// Rewrite every supported primitive into an equivalent `<path>` so all
/// downstream stages operate on one geometric representation.
///
/// Unsupported tags (text, ellipse, groups, existing paths) pass through
/// unchanged, which also makes normalization idempotent.
pub fn normalize_document(doc: &Document) -> Document {
    let mut out = doc.clone();
    normalize_children(&mut out.root);
    out
}

fn normalize_children(el: &mut Element) {
    for child in &mut el.children {
        if let Node::Element(e) = child {
            if let Some(d) = convert_to_path_data(e) {
                *e = replacement_path(e, d);
            }
            normalize_children(e);
        }
    }
}

fn convert_to_path_data(el: &Element) -> Option<String> {
    match el.name.as_str() {
        "line" => {
            let (x1, y1) = (el.num_attr("x1"), el.num_attr("y1"));
            let (x2, y2) = (el.num_attr("x2"), el.num_attr("y2"));
            Some(format!("M {x1} {y1} L {x2} {y2}"))
        }
        "rect" => {
            let (x, y) = (el.num_attr("x"), el.num_attr("y"));
            let (w, h) = (el.num_attr("width"), el.num_attr("height"));
            Some(format!("M {x} {y} h {w} v {h} h {} Z", -w))
        }
        "circle" => {
            let (cx, cy, r) = (el.num_attr("cx"), el.num_attr("cy"), el.num_attr("r"));
            Some(format!(
                "M {} {cy} A {r} {r} 0 1 1 {} {cy} A {r} {r} 0 1 1 {} {cy}",
                cx - r,
                cx + r,
                cx - r
            ))
        }
        "polyline" | "polygon" => {
            let points = el.attr("points").unwrap_or("");
            let tokens: Vec<&str> = points
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|t| !t.is_empty())
                .collect();
            if tokens.is_empty() {
                return None;
            }
            let mut d = String::new();
            for (pair, i) in (0..tokens.len()).step_by(2).enumerate() {
                let x = tokens[i].parse::<f64>().unwrap_or(0.0);
                let y = tokens
                    .get(i + 1)
                    .and_then(|t| t.parse::<f64>().ok())
                    .unwrap_or(0.0);
                if pair == 0 {
                    d.push_str(&format!("M {x} {y}"));
                } else {
                    d.push_str(&format!(" L {x} {y}"));
                }
            }
            if el.name == "polygon" {
                d.push_str(" Z");
            }
            Some(d)
        }
        _ => None,
    }
}

fn replacement_path(original: &Element, d: String) -> Element {
    let mut path = Element::new("path");
    path.set_attr("d", d);
    for (k, v) in &original.attrs {
        if !GEOMETRY_ATTRS.contains(&k.as_str()) {
            path.set_attr(k.clone(), v.clone());
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn normalize_str(svg: &str) -> Document {
        normalize_document(&Document::parse(svg).unwrap())
    }

    fn first_child(doc: &Document) -> &Element {
        doc.root
            .children
            .iter()
            .find_map(|n| match n {
                Node::Element(e) => Some(e),
                Node::Text(_) => None,
            })
            .unwrap()
    }

    #[test]
    fn line_converts_to_move_line() {
        let doc = normalize_str(r#"<svg><line x1="0" y1="0" x2="10" y2="0"/></svg>"#);
        let path = first_child(&doc);
        assert_eq!(path.name, "path");
        assert_eq!(path.attr("d"), Some("M 0 0 L 10 0"));
    }

    #[test]
    fn rect_converts_to_relative_outline() {
        let doc = normalize_str(r#"<svg><rect x="1" y="2" width="8" height="6"/></svg>"#);
        assert_eq!(first_child(&doc).attr("d"), Some("M 1 2 h 8 v 6 h -8 Z"));
    }

    #[test]
    fn circle_converts_to_two_arcs() {
        let doc = normalize_str(r#"<svg><circle cx="50" cy="50" r="40"/></svg>"#);
        assert_eq!(
            first_child(&doc).attr("d"),
            Some("M 10 50 A 40 40 0 1 1 90 50 A 40 40 0 1 1 10 50")
        );
    }

    #[test]
    fn polygon_closes_polyline_does_not() {
        let doc = normalize_str(r#"<svg><polygon points="0,0 10 0, 10,10"/></svg>"#);
        assert_eq!(first_child(&doc).attr("d"), Some("M 0 0 L 10 0 L 10 10 Z"));

        let doc = normalize_str(r#"<svg><polyline points="0,0 10,0"/></svg>"#);
        assert_eq!(first_child(&doc).attr("d"), Some("M 0 0 L 10 0"));
    }

    #[test]
    fn missing_attributes_default_to_zero() {
        let doc = normalize_str(r#"<svg><line x2="10"/></svg>"#);
        assert_eq!(first_child(&doc).attr("d"), Some("M 0 0 L 10 0"));

        let doc = normalize_str(r#"<svg><rect/></svg>"#);
        assert_eq!(first_child(&doc).attr("d"), Some("M 0 0 h 0 v 0 h -0 Z"));
    }

    #[test]
    fn non_geometric_attributes_survive_geometry_ones_do_not() {
        let doc = normalize_str(
            r#"<svg><rect x="1" y="2" width="8" height="6" id="box" fill="red" fill-rule="evenodd"/></svg>"#,
        );
        let path = first_child(&doc);
        assert_eq!(path.attr("id"), Some("box"));
        assert_eq!(path.attr("fill"), Some("red"));
        assert_eq!(path.attr("fill-rule"), Some("evenodd"));
        assert_eq!(path.attr("x"), None);
        assert_eq!(path.attr("width"), None);
    }

    #[test]
    fn unsupported_tags_pass_through() {
        let svg = r#"<svg><text x="5">hi</text><ellipse cx="1" cy="1"/></svg>"#;
        let doc = normalize_str(svg);
        let names: Vec<&str> = doc
            .root
            .children
            .iter()
            .filter_map(|n| match n {
                Node::Element(e) => Some(e.name.as_str()),
                Node::Text(_) => None,
            })
            .collect();
        assert_eq!(names, vec!["text", "ellipse"]);
    }

    #[test]
    fn normalizing_all_paths_is_idempotent() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M 0 0 L 5 5"/><g><path d="M 1 1 h 2"/></g></svg>"#;
        let once = normalize_str(svg);
        let twice = normalize_document(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn nested_shapes_are_normalized_in_place() {
        let doc = normalize_str(r#"<svg><g><line x1="0" y1="0" x2="4" y2="0"/></g></svg>"#);
        let g = first_child(&doc);
        assert_eq!(g.name, "g");
        let inner = match &g.children[0] {
            Node::Element(e) => e,
            Node::Text(_) => panic!("expected element"),
        };
        assert_eq!(inner.name, "path");
        assert_eq!(inner.attr("d"), Some("M 0 0 L 4 0"));
    }
}
