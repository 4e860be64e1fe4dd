use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use flipbook::{
    Canvas, Clock, DirStore, EditStatus, Editor, EditorConfig, ExportFormat, ExportOpts,
    FlipbookError, FlipbookResult, ManualClock, PlaybackCursor, PlaybackEvent, SystemClock,
    naming::next_available_name, restore_frames, run_playback, save_snapshot,
};
use tracing_subscriber::EnvFilter;

/// Directory exports land in when neither `--out` nor `--dir` is given.
const DEFAULT_EXPORT_DIR: &str = "FlipBook";

#[derive(Parser, Debug)]
#[command(name = "flipbook", version)]
struct Cli {
    /// Editor configuration JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a project with one blank frame.
    Init(InitArgs),
    /// Append a blank frame at the end (or a copy of the last frame).
    Add(AddArgs),
    /// Draw an image onto a frame (the last one unless `--frame` is given).
    Import(ImportArgs),
    /// Clear a frame (the last one unless `--frame` is given), or every frame with `--all`.
    Clear(ClearArgs),
    /// Print a summary of the project.
    Info(ProjectArgs),
    /// Run the playback schedule and print every event.
    Play(PlayArgs),
    /// Encode the frames as MP4 (requires `ffmpeg` on PATH) or GIF.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct ProjectArgs {
    /// Project directory.
    #[arg(long)]
    project: PathBuf,
}

#[derive(Args, Debug)]
struct InitArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Frame width in pixels.
    #[arg(long)]
    width: u32,

    /// Frame height in pixels.
    #[arg(long)]
    height: u32,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Copy the last frame instead of starting blank.
    #[arg(long)]
    duplicate: bool,
}

#[derive(Args, Debug)]
struct ImportArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Image to composite onto the frame (top-left aligned).
    #[arg(long)]
    image: PathBuf,

    /// Frame to draw on (1-based). Every run starts on the last frame; the selection is not
    /// saved.
    #[arg(long)]
    frame: Option<usize>,
}

#[derive(Args, Debug)]
struct ClearArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Discard every frame and start over from one blank frame.
    #[arg(long)]
    all: bool,

    /// Frame to clear (1-based). Every run starts on the last frame; the selection is not saved.
    #[arg(long, conflicts_with = "all")]
    frame: Option<usize>,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Run on a virtual clock instead of waiting between ticks.
    #[arg(long)]
    instant: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Output file.
    #[arg(long, conflicts_with = "dir")]
    out: Option<PathBuf>,

    /// Directory to pick a fresh `Video{n}` name in.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Container; defaults to the `--out` extension, else MP4.
    #[arg(long, value_enum)]
    format: Option<FormatChoice>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Mp4,
    Gif,
}

impl From<FormatChoice> for ExportFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::Mp4 => Self::Mp4,
            FormatChoice::Gif => Self::Gif,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EditorConfig::from_path(path)?,
        None => EditorConfig::default(),
    };
    match cli.cmd {
        Command::Init(args) => cmd_init(config, args),
        Command::Add(args) => cmd_add(config, args),
        Command::Import(args) => cmd_import(config, args),
        Command::Clear(args) => cmd_clear(config, args),
        Command::Info(args) => cmd_info(config, args),
        Command::Play(args) => cmd_play(config, args),
        Command::Export(args) => cmd_export(config, args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Notices (capacity, boundaries) are reported and end the command successfully.
fn or_notice<T>(res: FlipbookResult<T>) -> anyhow::Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_notice() => {
            println!("{e}");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn open_project(config: EditorConfig, project: &Path) -> anyhow::Result<(DirStore, Editor)> {
    if !project.is_dir() {
        anyhow::bail!(
            "project '{}' does not exist; run `flipbook init` first",
            project.display()
        );
    }
    let kv = DirStore::open(project)?;
    let frames = restore_frames(&kv, config.max_frames)
        .with_context(|| format!("load project '{}'", project.display()))?;
    if frames.is_empty() {
        anyhow::bail!(
            "project '{}' has no frames; run `flipbook init` first",
            project.display()
        );
    }
    let editor = Editor::with_frames(config, frames)?;
    Ok((kv, editor))
}

/// Move the cursor from the last frame back onto 1-based `frame`.
fn select_frame(editor: &mut Editor, frame: Option<usize>) -> anyhow::Result<()> {
    let Some(frame) = frame else {
        return Ok(());
    };
    let len = editor.store().len();
    if frame == 0 || frame > len {
        anyhow::bail!("frame {frame} is out of range (1..={len})");
    }
    while editor.store().current_index() + 1 > frame {
        editor.prev_frame()?;
    }
    Ok(())
}

fn save_project(kv: &mut DirStore, editor: &Editor) -> anyhow::Result<()> {
    save_snapshot(kv, &editor.snapshot())
        .with_context(|| format!("save project '{}'", kv.root().display()))?;
    Ok(())
}

fn cmd_init(config: EditorConfig, args: InitArgs) -> anyhow::Result<()> {
    let project = &args.project.project;
    let mut kv = DirStore::open(project)?;
    if !restore_frames(&kv, config.max_frames)?.is_empty() {
        anyhow::bail!("project '{}' already has frames", project.display());
    }
    let mut editor = Editor::new(config)?;
    editor.set_canvas(Canvas::new(args.width, args.height)?)?;
    save_project(&mut kv, &editor)?;
    println!(
        "created {} ({}x{})",
        project.display(),
        args.width,
        args.height
    );
    Ok(())
}

fn cmd_add(config: EditorConfig, args: AddArgs) -> anyhow::Result<()> {
    let (mut kv, mut editor) = open_project(config, &args.project.project)?;
    let res = if args.duplicate {
        editor.duplicate_frame()
    } else {
        editor.add_frame()
    };
    if or_notice(res)?.is_none() {
        return Ok(());
    }
    save_project(&mut kv, &editor)?;
    println!(
        "frame {} of {}",
        editor.store().current_index() + 1,
        editor.store().len()
    );
    Ok(())
}

fn cmd_import(config: EditorConfig, args: ImportArgs) -> anyhow::Result<()> {
    let (mut kv, mut editor) = open_project(config, &args.project.project)?;
    select_frame(&mut editor, args.frame)?;
    let img = image::open(&args.image)
        .with_context(|| format!("open image '{}'", args.image.display()))?
        .to_rgba8();
    let idx = editor.store().current_index();
    let frame = editor
        .current_frame_mut()
        .ok_or_else(|| FlipbookError::validation("no current frame to draw on"))?;
    frame.draw_image(&img);
    save_project(&mut kv, &editor)?;
    println!("drew {} onto frame {}", args.image.display(), idx + 1);
    Ok(())
}

fn cmd_clear(config: EditorConfig, args: ClearArgs) -> anyhow::Result<()> {
    let (mut kv, mut editor) = open_project(config, &args.project.project)?;
    select_frame(&mut editor, args.frame)?;
    if args.all {
        editor.reset_all()?;
    } else if editor.reset_current() == EditStatus::SkippedWhilePlaying {
        return Ok(());
    }
    save_project(&mut kv, &editor)?;
    println!("{} frame(s) left", editor.store().len());
    Ok(())
}

fn cmd_info(config: EditorConfig, args: ProjectArgs) -> anyhow::Result<()> {
    let (_kv, editor) = open_project(config, &args.project)?;
    let store = editor.store();
    let fps = editor.config().fps;
    println!("project: {}", args.project.display());
    if let Some(canvas) = store.canvas() {
        println!("size:    {}x{}", canvas.width, canvas.height);
    }
    println!("frames:  {} of {}", store.len(), store.max_frames());
    println!("current: {}", store.current_index() + 1);
    println!("fps:     {}/{}", fps.num, fps.den);
    Ok(())
}

fn cmd_play(config: EditorConfig, args: PlayArgs) -> anyhow::Result<()> {
    let (_kv, mut editor) = open_project(config, &args.project.project)?;
    let mut system = SystemClock;
    let mut manual = ManualClock::new();
    let clock: &mut dyn Clock = if args.instant {
        &mut manual
    } else {
        &mut system
    };

    let report = run_playback(&mut editor, clock, |_, step| {
        let shown = match step.cursor {
            PlaybackCursor::Frame(i) => format!("frame {}", i + 1),
            PlaybackCursor::Background => "background".to_string(),
        };
        let at = step.at.as_millis();
        match step.event {
            PlaybackEvent::Tick => println!("{at:>6}ms tick {:>2}: {shown}", step.tick),
            PlaybackEvent::Finish => println!("{at:>6}ms finish: editing {shown}"),
        }
        ControlFlow::Continue(())
    });
    match report {
        Some(r) => println!("{} ticks in {}ms", r.ticks, r.elapsed.as_millis()),
        None => println!("nothing to play"),
    }
    Ok(())
}

fn cmd_export(config: EditorConfig, args: ExportArgs) -> anyhow::Result<()> {
    let fps = config.fps;
    let background = config.background;
    let (_kv, editor) = open_project(config, &args.project.project)?;
    let format = args.format.map(ExportFormat::from);

    let out_path = match args.out {
        Some(out) => out,
        None => {
            let dir = args.dir.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR));
            let ext = format.unwrap_or(ExportFormat::Mp4).extension();
            let name = next_available_name(&dir, ext)?;
            dir.join(name)
        }
    };

    let mut opts = ExportOpts::new(&out_path, fps);
    opts.format = format;
    opts.background = background;
    let report = flipbook::export(&editor.snapshot(), &opts)?;

    println!(
        "wrote {} ({} frames, {}x{})",
        out_path.display(),
        report.frames,
        report.encoded.width,
        report.encoded.height
    );
    Ok(())
}
