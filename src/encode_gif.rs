use std::{
    path::{Path, PathBuf},
    sync::mpsc,
    thread,
    time::Duration,
};

use crate::{
    error::{AnimsvgError, AnimsvgResult},
    render_frames::FrameRgba,
};

/// Wall-clock limit the encoder gets before the export falls back to a
/// still-image sequence.
pub const ENCODE_TIMEOUT: Duration = Duration::from_secs(10);

pub const GIF_FILE_NAME: &str = "svg-animation.gif";

/// The encoder contract: ordered frames in, one encoded blob out. The
/// engine treats implementations as a black box that may fail or stall.
pub trait FrameSink: Send {
    fn encode(&self, frames: &[FrameRgba], delay_ms: u32) -> AnimsvgResult<Vec<u8>>;
}

/// Default sink: an infinitely-looping GIF via the `image` codec stack.
#[derive(Clone, Copy, Debug)]
pub struct GifSink {
    /// Quantization speed, 1 (best) to 30 (fastest).
    pub speed: i32,
}

impl Default for GifSink {
    fn default() -> Self {
        Self { speed: 10 }
    }
}

impl FrameSink for GifSink {
    fn encode(&self, frames: &[FrameRgba], delay_ms: u32) -> AnimsvgResult<Vec<u8>> {
        if frames.is_empty() {
            return Err(AnimsvgError::encode("no frames to encode"));
        }

        let mut out = Vec::new();
        {
            let mut encoder =
                image::codecs::gif::GifEncoder::new_with_speed(&mut out, self.speed);
            encoder
                .set_repeat(image::codecs::gif::Repeat::Infinite)
                .map_err(|e| AnimsvgError::encode(format!("failed to set gif loop: {e}")))?;

            for frame in frames {
                let img =
                    image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
                        .ok_or_else(|| {
                            AnimsvgError::encode("frame buffer does not match its dimensions")
                        })?;
                let delay = image::Delay::from_numer_denom_ms(delay_ms, 1);
                encoder
                    .encode_frame(image::Frame::from_parts(img, 0, 0, delay))
                    .map_err(|e| AnimsvgError::encode(format!("failed to encode gif frame: {e}")))?;
            }
        }
        Ok(out)
    }
}

/// Race the sink against a wall-clock timeout on a worker thread.
///
/// On timeout the pending result is discarded best-effort; the worker may
/// still run to completion unobserved. Exactly one attempt, no retries.
pub fn encode_with_timeout<S>(
    sink: S,
    frames: Vec<FrameRgba>,
    delay_ms: u32,
    timeout: Duration,
) -> AnimsvgResult<Vec<u8>>
where
    S: FrameSink + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(sink.encode(&frames, delay_ms));
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(_) => Err(AnimsvgError::encode("gif encoding timed out")),
    }
}

/// Fallback exporter: the same ordered frames as individually named still
/// images, `svg-animation-frame-NNN.png`, zero-padded from 000.
pub fn write_frame_sequence(frames: &[FrameRgba], dir: &Path) -> AnimsvgResult<Vec<PathBuf>> {
    use anyhow::Context as _;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create frame directory '{}'", dir.display()))?;

    let mut paths = Vec::with_capacity(frames.len());
    for (index, frame) in frames.iter().enumerate() {
        let path = dir.join(format!("svg-animation-frame-{index:03}.png"));
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(w: u32, h: u32, rgba: [u8; 4]) -> FrameRgba {
        FrameRgba {
            width: w,
            height: h,
            data: rgba
                .iter()
                .copied()
                .cycle()
                .take((w * h * 4) as usize)
                .collect(),
        }
    }

    struct StallingSink;

    impl FrameSink for StallingSink {
        fn encode(&self, _frames: &[FrameRgba], _delay_ms: u32) -> AnimsvgResult<Vec<u8>> {
            thread::sleep(Duration::from_millis(200));
            Ok(vec![])
        }
    }

    struct FailingSink;

    impl FrameSink for FailingSink {
        fn encode(&self, _frames: &[FrameRgba], _delay_ms: u32) -> AnimsvgResult<Vec<u8>> {
            Err(AnimsvgError::encode("sink rejected frames"))
        }
    }

    #[test]
    fn gif_sink_emits_gif_magic() {
        let frames = vec![
            solid_frame(8, 8, [255, 0, 0, 255]),
            solid_frame(8, 8, [0, 0, 255, 255]),
        ];
        let blob = GifSink::default().encode(&frames, 100).unwrap();
        assert!(blob.starts_with(b"GIF89a"));
    }

    #[test]
    fn gif_sink_rejects_empty_input() {
        assert!(GifSink::default().encode(&[], 100).is_err());
    }

    #[test]
    fn gif_sink_rejects_mismatched_buffers() {
        let bad = FrameRgba {
            width: 8,
            height: 8,
            data: vec![0; 7],
        };
        assert!(GifSink::default().encode(&[bad], 100).is_err());
    }

    #[test]
    fn timeout_discards_a_stalling_sink() {
        let frames = vec![solid_frame(2, 2, [0, 0, 0, 255])];
        let err = encode_with_timeout(StallingSink, frames, 100, Duration::from_millis(20))
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn sink_errors_pass_through_the_race() {
        let frames = vec![solid_frame(2, 2, [0, 0, 0, 255])];
        let err =
            encode_with_timeout(FailingSink, frames, 100, Duration::from_secs(5)).unwrap_err();
        assert!(err.to_string().contains("rejected"));
    }

    #[test]
    fn fast_sink_wins_the_race() {
        let frames = vec![solid_frame(4, 4, [10, 20, 30, 255])];
        let blob =
            encode_with_timeout(GifSink::default(), frames, 100, Duration::from_secs(30)).unwrap();
        assert!(blob.starts_with(b"GIF89a"));
    }

    #[test]
    fn frame_sequence_names_are_zero_padded() {
        let dir = std::path::PathBuf::from("target").join("frame_sequence_test");
        let _ = std::fs::remove_dir_all(&dir);

        let frames: Vec<FrameRgba> =
            (0..3).map(|_| solid_frame(4, 4, [1, 2, 3, 255])).collect();
        let paths = write_frame_sequence(&frames, &dir).unwrap();

        assert_eq!(paths.len(), 3);
        assert!(paths[0].ends_with("svg-animation-frame-000.png"));
        assert!(paths[2].ends_with("svg-animation-frame-002.png"));
        for p in &paths {
            assert!(p.exists());
        }
    }
}
