//! animsvg turns a static SVG document into a time-based animation and
//! re-emits it in three output modalities that share one timing model:
//!
//! 1. **SMIL**: a self-playing annotated SVG document (live preview)
//! 2. **CSS**: a standalone HTML document driven by keyframe rules
//! 3. **Frames**: a rasterized frame sequence encoded as a looping GIF,
//!    with a still-PNG-sequence fallback when the encoder fails or stalls
//!
//! # Pipeline overview
//!
//! 1. **Normalize**: every primitive shape becomes an equivalent `<path>`
//! 2. **Schedule**: `(element index, settings) -> start/duration/key times`
//! 3. **Strategize**: one instruction per element per animation family
//! 4. **Render**: project the instructions onto SMIL, CSS, or raw frames
//!
//! The renderers are independent projections of the same model; every
//! settings change recomputes the animated document from scratch.
#![forbid(unsafe_code)]

pub mod dom;
pub mod encode_gif;
pub mod error;
pub mod geometry;
pub mod model;
pub mod normalize;
pub mod notify;
pub mod pipeline;
pub mod render_css;
pub mod render_frames;
pub mod render_smil;
pub mod strategy;
pub mod timing;

pub use dom::{Document, Element, Node};
pub use encode_gif::{
    ENCODE_TIMEOUT, FrameSink, GIF_FILE_NAME, GifSink, encode_with_timeout, write_frame_sequence,
};
pub use error::{AnimsvgError, AnimsvgResult};
pub use geometry::{GeometryMetrics, PathEstimator, TreeMetrics};
pub use model::{AnimationKind, AnimationSettings, Linecap, StaggerStyle, Theme};
pub use normalize::normalize_document;
pub use notify::{LogNotifier, Notifier, NullNotifier, Severity};
pub use pipeline::{Animator, ExportArtifact};
pub use render_css::export_html;
pub use render_frames::{
    FRAME_FPS, FRAME_HEIGHT, FRAME_WIDTH, FrameRgba, GIF_FRAME_CAP, frame_count, frame_document,
    rasterize, render_frame_sequence,
};
pub use render_smil::synthesize;
pub use strategy::{AnimationInstruction, AnimationTarget, ShapeContext, TransformKind};
pub use timing::{TimingSchedule, schedule, stagger_step};
