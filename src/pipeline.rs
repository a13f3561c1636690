use std::path::{Path, PathBuf};

use crate::{
    dom::Document,
    encode_gif::{self, ENCODE_TIMEOUT, FrameSink, GIF_FILE_NAME},
    error::AnimsvgResult,
    geometry::{GeometryMetrics, PathEstimator},
    model::{AnimationSettings, Theme},
    normalize,
    notify::{Notifier, Severity},
    render_css, render_frames, render_smil,
};

/// What a GIF export produced: the encoded file, or the still-image
/// fallback sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportArtifact {
    Gif(PathBuf),
    FrameSequence { dir: PathBuf, count: usize },
}

/// Top-level synthesis pipeline: parse and normalize once, then derive
/// every artifact from the normalized document plus a settings snapshot.
///
/// There is no incremental patching; each call recomputes from scratch, so
/// no stale annotation can linger from a previous configuration.
pub struct Animator {
    normalized: Document,
}

impl Animator {
    pub fn from_svg_text(text: &str) -> AnimsvgResult<Self> {
        let doc = Document::parse(text)?;
        Ok(Self {
            normalized: normalize::normalize_document(&doc),
        })
    }

    pub fn normalized(&self) -> &Document {
        &self.normalized
    }

    /// The SMIL-annotated live preview document.
    pub fn synthesize(&self, settings: &AnimationSettings) -> AnimsvgResult<Document> {
        self.synthesize_with(settings, &PathEstimator)
    }

    pub fn synthesize_with(
        &self,
        settings: &AnimationSettings,
        metrics: &dyn GeometryMetrics,
    ) -> AnimsvgResult<Document> {
        render_smil::synthesize(&self.normalized, settings, metrics)
    }

    /// The standalone CSS-driven HTML document.
    pub fn export_css(&self, settings: &AnimationSettings) -> AnimsvgResult<String> {
        let animated = self.synthesize(settings)?;
        Ok(render_css::export_html(&animated, settings))
    }

    /// One rasterized frame at sample time `t` (stroke family only).
    pub fn rasterize_at(
        &self,
        settings: &AnimationSettings,
        theme: Theme,
        t: f64,
    ) -> AnimsvgResult<render_frames::FrameRgba> {
        let animated = self.synthesize(settings)?;
        let frame = render_frames::frame_document(&animated, settings, t)?;
        render_frames::rasterize(
            &frame,
            theme,
            render_frames::FRAME_WIDTH,
            render_frames::FRAME_HEIGHT,
        )
    }

    /// Render the stroke animation to frames and encode a looping GIF into
    /// `out_dir`; on encoder failure or timeout, fall back to the full
    /// still-image sequence in the same directory.
    #[tracing::instrument(skip_all, fields(theme = ?theme))]
    pub fn export_gif<S>(
        &self,
        settings: &AnimationSettings,
        theme: Theme,
        out_dir: &Path,
        sink: S,
        notifier: &dyn Notifier,
    ) -> AnimsvgResult<ExportArtifact>
    where
        S: FrameSink + 'static,
    {
        use anyhow::Context as _;

        let animated = self.synthesize(settings)?;
        let frames = render_frames::render_frame_sequence(
            &animated,
            settings,
            theme,
            Some(render_frames::GIF_FRAME_CAP),
        )?;

        match encode_gif::encode_with_timeout(
            sink,
            frames,
            render_frames::frame_delay_ms(),
            ENCODE_TIMEOUT,
        ) {
            Ok(blob) => {
                std::fs::create_dir_all(out_dir).with_context(|| {
                    format!("failed to create output directory '{}'", out_dir.display())
                })?;
                let path = out_dir.join(GIF_FILE_NAME);
                std::fs::write(&path, blob)
                    .with_context(|| format!("write gif '{}'", path.display()))?;
                notifier.notify("GIF exported successfully!", Severity::Success);
                Ok(ExportArtifact::Gif(path))
            }
            Err(e) => {
                tracing::warn!(error = %e, "gif encoding failed, falling back to frame export");
                notifier.notify(
                    "GIF generation failed or timed out. Exporting frames instead...",
                    Severity::Error,
                );

                let frames =
                    render_frames::render_frame_sequence(&animated, settings, theme, None)?;
                let paths = encode_gif::write_frame_sequence(&frames, out_dir)?;
                notifier.notify(
                    &format!(
                        "Exported {} frames! Use online tools to create GIF.",
                        paths.len()
                    ),
                    Severity::Success,
                );
                Ok(ExportArtifact::FrameSequence {
                    dir: out_dir.to_path_buf(),
                    count: paths.len(),
                })
            }
        }
    }
}
