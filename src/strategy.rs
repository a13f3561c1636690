use std::f64::consts::TAU;

use kurbo::Point;

use crate::{model::AnimationKind, timing::TimingSchedule};

/// What an instruction animates: a plain attribute (`<animate>`) or one
/// transform kind (`<animateTransform>`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationTarget {
    Attribute(&'static str),
    Transform(TransformKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformKind {
    Translate,
    Scale,
    Rotate,
}

impl TransformKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Scale => "scale",
            Self::Rotate => "rotate",
        }
    }
}

/// Measured geometry an instruction builder may need: path length for the
/// stroke family, bounding-box center for the pivoting families.
#[derive(Clone, Copy, Debug)]
pub struct ShapeContext {
    pub length: f64,
    pub center: Point,
}

/// The common output contract of every animation family, consumed
/// identically by the SMIL and stylesheet renderers.
///
/// Hold policy is always freeze-at-last-value: renderers emit it
/// unconditionally, so the end state persists after playback.
#[derive(Clone, Debug)]
pub struct AnimationInstruction {
    pub target: AnimationTarget,
    pub values: Vec<String>,
    pub key_times: Option<Vec<f64>>,
    pub start: f64,
    pub duration: f64,
    /// Pivot point, scale family only.
    pub transform_origin: Option<Point>,
}

/// Build the instruction for one element. Closed over [`AnimationKind`];
/// adding a family extends this match.
pub fn build(
    kind: AnimationKind,
    shape: &ShapeContext,
    sched: &TimingSchedule,
    index: usize,
    count: usize,
) -> AnimationInstruction {
    let base = |target, values| AnimationInstruction {
        target,
        values,
        key_times: sched.key_times.clone(),
        start: sched.start,
        duration: sched.duration,
        transform_origin: None,
    };

    match kind {
        AnimationKind::Stroke => base(
            AnimationTarget::Attribute("stroke-dashoffset"),
            vec![format!("{}", shape.length), "0".to_string()],
        ),
        AnimationKind::Typewriter => base(
            AnimationTarget::Attribute("opacity"),
            vec!["0".to_string(), "0".to_string(), "1".to_string()],
        ),
        AnimationKind::Fade => base(
            AnimationTarget::Attribute("opacity"),
            vec!["0".to_string(), "1".to_string()],
        ),
        AnimationKind::Scale => {
            let mut instr = base(
                AnimationTarget::Transform(TransformKind::Scale),
                vec!["0".to_string(), "1.2".to_string(), "1".to_string()],
            );
            instr.transform_origin = Some(shape.center);
            instr
        }
        AnimationKind::Slide => base(
            AnimationTarget::Transform(TransformKind::Translate),
            vec!["-100,0".to_string(), "0,0".to_string()],
        ),
        AnimationKind::Bounce => base(
            AnimationTarget::Transform(TransformKind::Translate),
            vec![
                "0,-50".to_string(),
                "0,10".to_string(),
                "0,-5".to_string(),
                "0,0".to_string(),
            ],
        ),
        AnimationKind::Rotate => base(
            AnimationTarget::Transform(TransformKind::Rotate),
            vec![
                format!("360 {} {}", shape.center.x, shape.center.y),
                format!("0 {} {}", shape.center.x, shape.center.y),
            ],
        ),
        AnimationKind::Spread => {
            let (dx, dy) = spread_offset(index, count);
            base(
                AnimationTarget::Transform(TransformKind::Translate),
                vec![format!("{dx},{dy}"), "0,0".to_string()],
            )
        }
    }
}

/// Displacement for the spread family: elements scatter outward on a circle
/// of fixed radius 100, one full turn shared evenly across the element set.
pub fn spread_offset(index: usize, count: usize) -> (f64, f64) {
    let angle = index as f64 / count.max(1) as f64 * TAU;
    (angle.cos() * 100.0, angle.sin() * 100.0)
}
