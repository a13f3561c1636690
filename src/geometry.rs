use kurbo::{BezPath, ParamCurveArclen as _, Point, Rect, Shape as _};

use crate::{
    dom::{Document, Element, Node},
    error::{AnimsvgError, AnimsvgResult},
};

/// Box assumed for elements whose geometry cannot be measured. Rotate/scale
/// animations on such elements pivot around its center, (50, 50).
pub const FALLBACK_BOX: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

const ARCLEN_ACCURACY: f64 = 1e-3;

/// Path measurement behind a seam so renderers stay deterministic in
/// headless environments.
///
/// Dash-array/offset values are derived from `path_length`, so both
/// implementations compute true arc length, not a polyline estimate.
pub trait GeometryMetrics {
    /// Total drawable length along the path.
    fn path_length(&self, d: &str) -> AnimsvgResult<f64>;

    /// Bounding-box center of the element, falling back to the center of
    /// [`FALLBACK_BOX`] when the element has no measurable geometry.
    fn element_center(&self, element: &Element) -> Point;
}

pub fn parse_path(d: &str) -> AnimsvgResult<BezPath> {
    BezPath::from_svg(d.trim())
        .map_err(|e| AnimsvgError::input(format!("invalid path data: {e}")))
}

fn bez_length(path: &BezPath) -> f64 {
    path.segments().map(|seg| seg.arclen(ARCLEN_ACCURACY)).sum()
}

/// Pure geometric estimator over the path description itself. Default
/// implementation everywhere; needs no layout surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathEstimator;

impl GeometryMetrics for PathEstimator {
    fn path_length(&self, d: &str) -> AnimsvgResult<f64> {
        Ok(bez_length(&parse_path(d)?))
    }

    fn element_center(&self, element: &Element) -> Point {
        element
            .attr("d")
            .and_then(|d| BezPath::from_svg(d.trim()).ok())
            .filter(|p| p.segments().next().is_some())
            .map(|p| p.bounding_box().center())
            .unwrap_or_else(|| FALLBACK_BOX.center())
    }
}

/// Measurement-surface-backed metrics: elements are resolved through a usvg
/// pass, so transforms and unit handling follow the renderer exactly.
pub struct TreeMetrics {
    opt: usvg::Options<'static>,
}

impl TreeMetrics {
    pub fn new() -> Self {
        Self {
            opt: usvg::Options::default(),
        }
    }

    fn parse_wrapped(&self, element: &Element) -> Option<usvg::Tree> {
        let mut root = Element::new("svg");
        root.set_attr("xmlns", "http://www.w3.org/2000/svg");
        root.append_child(Node::Element(element.clone()));
        let text = Document { root }.to_svg_string();
        usvg::Tree::from_str(&text, &self.opt).ok()
    }
}

impl Default for TreeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryMetrics for TreeMetrics {
    fn path_length(&self, d: &str) -> AnimsvgResult<f64> {
        let mut path = Element::new("path");
        path.set_attr("d", d);
        let tree = self
            .parse_wrapped(&path)
            .ok_or_else(|| AnimsvgError::input("invalid path data"))?;
        let resolved = first_path(tree.root())
            .ok_or_else(|| AnimsvgError::input("path produced no measurable geometry"))?;
        Ok(bez_length(&tiny_path_to_bez(resolved.data())))
    }

    fn element_center(&self, element: &Element) -> Point {
        let center = self.parse_wrapped(element).and_then(|tree| {
            let path = first_path(tree.root())?;
            let bbox = path.abs_bounding_box();
            Some(Point::new(
                f64::from(bbox.x()) + f64::from(bbox.width()) / 2.0,
                f64::from(bbox.y()) + f64::from(bbox.height()) / 2.0,
            ))
        });
        center.unwrap_or_else(|| FALLBACK_BOX.center())
    }
}

fn first_path(group: &usvg::Group) -> Option<&usvg::Path> {
    for node in group.children() {
        match node {
            usvg::Node::Path(p) => return Some(p.as_ref()),
            usvg::Node::Group(g) => {
                if let Some(p) = first_path(g.as_ref()) {
                    return Some(p);
                }
            }
            usvg::Node::Image(_) | usvg::Node::Text(_) => {}
        }
    }
    None
}

fn tiny_path_to_bez(path: &usvg::tiny_skia_path::Path) -> BezPath {
    use usvg::tiny_skia_path::PathSegment;

    let mut bez = BezPath::new();
    for seg in path.segments() {
        match seg {
            PathSegment::MoveTo(p) => bez.move_to((f64::from(p.x), f64::from(p.y))),
            PathSegment::LineTo(p) => bez.line_to((f64::from(p.x), f64::from(p.y))),
            PathSegment::QuadTo(p1, p) => bez.quad_to(
                (f64::from(p1.x), f64::from(p1.y)),
                (f64::from(p.x), f64::from(p.y)),
            ),
            PathSegment::CubicTo(p1, p2, p) => bez.curve_to(
                (f64::from(p1.x), f64::from(p1.y)),
                (f64::from(p2.x), f64::from(p2.y)),
                (f64::from(p.x), f64::from(p.y)),
            ),
            PathSegment::Close => bez.close_path(),
        }
    }
    bez
}
