use crate::{
    dom::{Document, SMIL_TAGS},
    error::{AnimsvgError, AnimsvgResult},
    model::{AnimationKind, AnimationSettings, Theme},
    timing,
};

pub const FRAME_WIDTH: u32 = 800;
pub const FRAME_HEIGHT: u32 = 600;
pub const FRAME_FPS: u32 = 10;
/// GIF exports cap the frame count to bound encode time; the PNG fallback
/// writes the full sequence.
pub const GIF_FRAME_CAP: usize = 50;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// One rasterized frame, opaque straight RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

pub fn frame_delay_ms() -> u32 {
    1000 / FRAME_FPS
}

/// Sampled span: the active window plus a half-second tail so the frozen
/// end state is visible in the loop.
pub fn total_seconds(settings: &AnimationSettings) -> f64 {
    settings.duration + settings.delay + 0.5
}

pub fn frame_count(settings: &AnimationSettings, cap: Option<usize>) -> usize {
    let n = (total_seconds(settings) * f64::from(FRAME_FPS)).ceil() as usize;
    match cap {
        Some(cap) => n.min(cap),
        None => n,
    }
}

/// Sample the stroke timing model at `t`: every path gets the dash offset
/// it would have at that instant, and SMIL children are stripped so the
/// document is purely attribute values.
///
/// Only the stroke family can be sampled this way; other families are
/// rejected rather than mis-rendered.
pub fn frame_document(
    animated: &Document,
    settings: &AnimationSettings,
    t: f64,
) -> AnimsvgResult<Document> {
    if settings.kind != AnimationKind::Stroke {
        return Err(AnimsvgError::animation(
            "frame export supports the stroke family only",
        ));
    }

    let mut doc = animated.clone();
    let count = doc.count_tags(&["path"]);
    doc.visit_tags_mut(&["path"], &mut |index, el| {
        let length = el.num_attr("stroke-dasharray");
        let sched = timing::schedule(index, count, settings);
        let progress = ((t - sched.start) / sched.duration).clamp(0.0, 1.0);
        let offset = length * (1.0 - progress);
        el.set_attr("stroke-dashoffset", format!("{offset}"));
        el.remove_child_tags(SMIL_TAGS);
    });

    Ok(doc)
}

/// Render one static document into a center-fit bitmap of the given size.
pub fn rasterize(
    doc: &Document,
    theme: Theme,
    width: u32,
    height: u32,
) -> AnimsvgResult<FrameRgba> {
    let mut doc = doc.clone();
    if doc.root.attr("xmlns").is_none() {
        // usvg only accepts namespaced documents.
        doc.root.attrs.insert(0, ("xmlns".to_string(), SVG_NS.to_string()));
    }
    let text = doc.to_svg_string();

    let tree = usvg::Tree::from_str(&text, &usvg::Options::default())
        .map_err(|e| AnimsvgError::raster(format!("frame svg failed to parse: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| AnimsvgError::raster("failed to allocate frame pixmap"))?;
    let [r, g, b, a] = theme.background_rgba();
    pixmap.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, a));

    let size = tree.size();
    let (sw, sh) = (f64::from(size.width()), f64::from(size.height()));
    if !sw.is_finite() || !sh.is_finite() || sw <= 0.0 || sh <= 0.0 {
        return Err(AnimsvgError::raster("frame svg has invalid size"));
    }

    let scale = (f64::from(width) / sw).min(f64::from(height) / sh);
    let tx = (f64::from(width) - sw * scale) / 2.0;
    let ty = (f64::from(height) - sh * scale) / 2.0;
    let xform =
        resvg::tiny_skia::Transform::from_row(scale as f32, 0.0, 0.0, scale as f32, tx as f32, ty as f32);

    resvg::render(&tree, xform, &mut pixmap.as_mut());

    // The background is opaque, so premultiplied output equals straight rgba.
    Ok(FrameRgba {
        width,
        height,
        data: pixmap.data().to_vec(),
    })
}

/// Render the ordered frame sequence. Strictly sequential and deterministic
/// by frame index; any failing frame aborts the whole export.
#[tracing::instrument(skip_all, fields(cap = ?cap))]
pub fn render_frame_sequence(
    animated: &Document,
    settings: &AnimationSettings,
    theme: Theme,
    cap: Option<usize>,
) -> AnimsvgResult<Vec<FrameRgba>> {
    let total = total_seconds(settings);
    let n = frame_count(settings, cap);

    let mut frames = Vec::with_capacity(n);
    for index in 0..n {
        let t = index as f64 / n as f64 * total;
        let doc = frame_document(animated, settings, t)?;
        frames.push(rasterize(&doc, theme, FRAME_WIDTH, FRAME_HEIGHT)?);
    }
    Ok(frames)
}
