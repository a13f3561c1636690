use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use animsvg::{
    AnimationKind, AnimationSettings, Animator, ExportArtifact, GifSink, Linecap, Notifier,
    Severity, StaggerStyle, Theme,
};

#[derive(Parser, Debug)]
#[command(name = "animsvg", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Emit the self-playing SMIL-animated SVG document.
    Preview(PreviewArgs),
    /// Emit a standalone HTML document driven by CSS keyframes.
    ExportCss(ExportCssArgs),
    /// Render stroke frames and encode a looping GIF (PNG-sequence fallback).
    ExportGif(ExportGifArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct SettingsArgs {
    /// Settings JSON; explicit flags below override its values.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Animation duration in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Start delay in seconds.
    #[arg(long)]
    delay: Option<f64>,

    /// Stroke width in px (stroke family).
    #[arg(long)]
    stroke_width: Option<f64>,

    /// Stroke color (stroke family).
    #[arg(long)]
    stroke_color: Option<String>,

    /// Stroke line cap.
    #[arg(long, value_enum)]
    linecap: Option<Linecap>,

    /// Stagger style.
    #[arg(long, value_enum)]
    style: Option<StaggerStyle>,

    /// Animation family.
    #[arg(long = "type", value_enum)]
    kind: Option<AnimationKind>,
}

impl SettingsArgs {
    fn resolve(&self) -> anyhow::Result<AnimationSettings> {
        let mut s = match &self.settings {
            Some(path) => {
                let f = File::open(path)
                    .with_context(|| format!("open settings '{}'", path.display()))?;
                serde_json::from_reader(BufReader::new(f))
                    .with_context(|| "parse settings JSON")?
            }
            None => AnimationSettings::default(),
        };

        if let Some(v) = self.duration {
            s.duration = v;
        }
        if let Some(v) = self.delay {
            s.delay = v;
        }
        if let Some(v) = self.stroke_width {
            s.stroke_width = v;
        }
        if let Some(v) = &self.stroke_color {
            s.stroke_color = v.clone();
        }
        if let Some(v) = self.linecap {
            s.linecap = v;
        }
        if let Some(v) = self.style {
            s.style = v;
        }
        if let Some(v) = self.kind {
            s.kind = v;
        }

        s.validate()?;
        Ok(s)
    }
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input SVG file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Parser, Debug)]
struct ExportCssArgs {
    /// Input SVG file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output HTML path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Parser, Debug)]
struct ExportGifArgs {
    /// Input SVG file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for the GIF (or the fallback frame sequence).
    #[arg(long)]
    out_dir: PathBuf,

    /// Frame background theme.
    #[arg(long, value_enum, default_value_t = Theme::Light)]
    theme: Theme,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input SVG file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Sample time in seconds.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Frame background theme.
    #[arg(long, value_enum, default_value_t = Theme::Light)]
    theme: Theme,

    #[command(flatten)]
    settings: SettingsArgs,
}

/// Toast-equivalent for a terminal: severity-tagged lines on stderr.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        eprintln!("[{}] {message}", severity.as_str());
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Preview(args) => cmd_preview(args),
        Command::ExportCss(args) => cmd_export_css(args),
        Command::ExportGif(args) => cmd_export_gif(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn read_animator(path: &Path) -> anyhow::Result<Animator> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("open svg '{}'", path.display()))?;
    Ok(Animator::from_svg_text(&text)?)
}

fn write_text(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let settings = args.settings.resolve()?;
    let animator = read_animator(&args.in_path)?;
    let animated = animator.synthesize(&settings)?;
    write_text(&args.out, &animated.to_svg_string())?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export_css(args: ExportCssArgs) -> anyhow::Result<()> {
    let settings = args.settings.resolve()?;
    let animator = read_animator(&args.in_path)?;
    let html = animator.export_css(&settings)?;
    write_text(&args.out, &html)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export_gif(args: ExportGifArgs) -> anyhow::Result<()> {
    let settings = args.settings.resolve()?;
    let animator = read_animator(&args.in_path)?;

    let artifact = animator.export_gif(
        &settings,
        args.theme,
        &args.out_dir,
        GifSink::default(),
        &StderrNotifier,
    )?;

    match artifact {
        ExportArtifact::Gif(path) => eprintln!("wrote {}", path.display()),
        ExportArtifact::FrameSequence { dir, count } => {
            eprintln!("wrote {count} frames to {}", dir.display())
        }
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let settings = args.settings.resolve()?;
    let animator = read_animator(&args.in_path)?;
    let frame = animator.rasterize_at(&settings, args.theme, args.time)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
