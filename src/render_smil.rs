use crate::{
    dom::{ANIMATED_TAGS, Document, Element, Node, SMIL_TAGS},
    error::AnimsvgResult,
    geometry::{FALLBACK_BOX, GeometryMetrics},
    model::{AnimationKind, AnimationSettings, StaggerStyle},
    strategy::{self, AnimationInstruction, AnimationTarget, ShapeContext},
    timing,
};

/// Project the timing model onto self-playing SMIL annotations.
///
/// Pure recompute-from-scratch: the normalized document is cloned, any
/// annotations from a previous pass are cleared, and the current settings
/// snapshot is applied in full. Output feeds the live preview and the frame
/// rasterizer.
#[tracing::instrument(skip_all, fields(kind = ?settings.kind, style = ?settings.style))]
pub fn synthesize(
    normalized: &Document,
    settings: &AnimationSettings,
    metrics: &dyn GeometryMetrics,
) -> AnimsvgResult<Document> {
    settings.validate()?;

    let mut doc = normalized.clone();
    clear_animations(&mut doc);

    match settings.kind {
        AnimationKind::Stroke if settings.style == StaggerStyle::Continuous => {
            apply_continuous(&mut doc, settings, metrics)?;
        }
        AnimationKind::Stroke => apply_stroke(&mut doc, settings, metrics)?,
        _ => apply_family(&mut doc, settings, metrics),
    }

    Ok(doc)
}

/// Strip SMIL children and reset the attributes earlier passes may have
/// set, so no stale annotation lingers from a previous configuration.
pub fn clear_animations(doc: &mut Document) {
    doc.visit_elements_mut(&mut |el| {
        el.remove_child_tags(SMIL_TAGS);
        el.remove_attr("style");
        el.remove_attr("transform");
        el.remove_attr("opacity");
    });
}

fn apply_stroke(
    doc: &mut Document,
    settings: &AnimationSettings,
    metrics: &dyn GeometryMetrics,
) -> AnimsvgResult<()> {
    let count = doc.count_tags(&["path"]);
    let mut first_err = None;

    doc.visit_tags_mut(&["path"], &mut |index, el| {
        if first_err.is_some() {
            return;
        }
        let d = el.attr("d").unwrap_or("").to_string();
        let length = match metrics.path_length(&d) {
            Ok(length) => length,
            Err(e) => {
                first_err = Some(e);
                return;
            }
        };

        prepare_stroke_element(el, settings, length);

        let sched = timing::schedule(index, count, settings);
        let shape = ShapeContext {
            length,
            center: metrics.element_center(el),
        };
        let instr = strategy::build(AnimationKind::Stroke, &shape, &sched, index, count);
        attach_instruction(el, &instr);
    });

    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Continuous style: concatenate every path description in document order
/// into one combined path and animate that alone. Sub-paths that are not
/// contiguous join with a visible jump; the merge is intentionally the
/// simplest possible one.
fn apply_continuous(
    doc: &mut Document,
    settings: &AnimationSettings,
    metrics: &dyn GeometryMetrics,
) -> AnimsvgResult<()> {
    let mut parts: Vec<String> = Vec::new();
    doc.visit_tags_mut(&["path"], &mut |_, el| {
        if let Some(d) = el.attr("d") {
            if !d.is_empty() {
                parts.push(d.to_string());
            }
        }
    });
    doc.retain_elements(&|el| el.name != "path");

    if parts.is_empty() {
        return Ok(());
    }

    let combined = parts.join(" ");
    let length = metrics.path_length(&combined)?;

    let mut path = Element::new("path");
    path.set_attr("d", combined);
    prepare_stroke_element(&mut path, settings, length);

    let sched = timing::schedule(0, 1, settings);
    let shape = ShapeContext {
        length,
        center: FALLBACK_BOX.center(),
    };
    let instr = strategy::build(AnimationKind::Stroke, &shape, &sched, 0, 1);
    attach_instruction(&mut path, &instr);

    doc.root.append_child(Node::Element(path));
    Ok(())
}

fn apply_family(doc: &mut Document, settings: &AnimationSettings, metrics: &dyn GeometryMetrics) {
    let count = doc.count_tags(ANIMATED_TAGS);

    doc.visit_tags_mut(ANIMATED_TAGS, &mut |index, el| {
        if matches!(
            settings.kind,
            AnimationKind::Typewriter | AnimationKind::Fade
        ) {
            // These fade in from nothing; the element must start hidden.
            el.set_attr("opacity", "0");
        }

        let sched = timing::schedule(index, count, settings);
        let shape = shape_context(el, metrics);
        let instr = strategy::build(settings.kind, &shape, &sched, index, count);
        attach_instruction(el, &instr);
    });
}

fn shape_context(el: &Element, metrics: &dyn GeometryMetrics) -> ShapeContext {
    let length = el
        .attr("d")
        .and_then(|d| metrics.path_length(d).ok())
        .unwrap_or(0.0);
    ShapeContext {
        length,
        center: metrics.element_center(el),
    }
}

fn prepare_stroke_element(el: &mut Element, settings: &AnimationSettings, length: f64) {
    el.set_attr("stroke", settings.stroke_color.clone());
    el.set_attr("stroke-width", format!("{}", settings.stroke_width));
    el.set_attr("stroke-linecap", settings.linecap.as_str());
    el.set_attr("stroke-linejoin", settings.linecap.linejoin());
    el.set_attr("fill", "none");
    el.set_attr("stroke-dasharray", format!("{length}"));
    el.set_attr("stroke-dashoffset", format!("{length}"));
    el.add_class("animated-path");
}

/// Attach one instruction as a SMIL child. Freeze-at-last-value is emitted
/// unconditionally so the end state persists after playback.
pub fn attach_instruction(el: &mut Element, instr: &AnimationInstruction) {
    let mut anim = match instr.target {
        AnimationTarget::Attribute(name) => {
            let mut a = Element::new("animate");
            a.set_attr("attributeName", name);
            a
        }
        AnimationTarget::Transform(kind) => {
            let mut a = Element::new("animateTransform");
            a.set_attr("attributeName", "transform");
            a.set_attr("type", kind.as_str());
            a
        }
    };

    anim.set_attr("values", instr.values.join(";"));
    if let Some(key_times) = &instr.key_times {
        let joined = key_times
            .iter()
            .map(|t| format!("{t}"))
            .collect::<Vec<_>>()
            .join(";");
        anim.set_attr("keyTimes", joined);
    }
    anim.set_attr("dur", format!("{}s", instr.duration));
    anim.set_attr("begin", format!("{}s", instr.start));
    anim.set_attr("fill", "freeze");
    if let Some(origin) = instr.transform_origin {
        anim.set_attr("transform-origin", format!("{} {}", origin.x, origin.y));
    }

    el.append_child(Node::Element(anim));
}
