use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use thumbforge::{
    BackgroundPriority, CompositionState, Compositor, CpuBackend, FontBook, PresentOutcome,
    SourceLoader, Studio, StudioConfig, StudioMode,
};

#[derive(Parser, Debug)]
#[command(name = "thumbforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a composition state to a PNG.
    Render(RenderArgs),
    /// Print the default composition state as JSON.
    Defaults,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Composition state JSON (camelCase fields; missing fields take defaults).
    #[arg(long)]
    state: PathBuf,

    /// Studio config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Studio mode: classic or ugc-fusion.
    #[arg(long, default_value_t = StudioMode::Classic)]
    mode: StudioMode,

    /// Override the mode's background priority (prefer-generated or prefer-uploaded-base).
    #[arg(long)]
    priority: Option<BackgroundPriority>,

    /// Output PNG path, or a directory to receive `thumbnail-<millis>.png`.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Defaults => {
            println!("{}", CompositionState::default().to_json_pretty()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<StudioConfig> {
    let cfg = match path {
        Some(p) => StudioConfig::load_from_file(p)?,
        None => StudioConfig::default(),
    };
    Ok(cfg.with_env_overrides()?)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let json = std::fs::read_to_string(&args.state)
        .with_context(|| format!("read state '{}'", args.state.display()))?;
    let state = CompositionState::from_json_str(&json)?;

    let fonts = FontBook::load_dir(&cfg.fonts_dir, &cfg.font_files)?;
    if fonts.is_empty() {
        tracing::warn!(
            dir = %cfg.fonts_dir.display(),
            "no fonts loaded; text layers will be skipped"
        );
    }

    let mut policy = args.mode.policy().with_grid_spacing(cfg.grid_spacing);
    if let Some(priority) = args.priority {
        policy = policy.with_priority(priority);
    }

    let loader = SourceLoader::new().with_http_timeout(cfg.http_timeout());
    let compositor = Compositor::new(loader, CpuBackend::new(fonts));
    let mut studio = Studio::new(args.mode, compositor)
        .with_policy(policy)
        .with_state(state);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    match runtime.block_on(studio.render()) {
        PresentOutcome::Presented { generation } => {
            tracing::debug!(generation, "render presented");
        }
        PresentOutcome::Stale { generation, superseded_by } => {
            anyhow::bail!("render {generation} was superseded by {superseded_by}");
        }
    }

    let export = studio.export_png()?;
    let path = match args.out {
        Some(out) if out.is_dir() => export.write_to_dir(&out)?,
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&out, &export.bytes)
                .with_context(|| format!("write png '{}'", out.display()))?;
            out
        }
        None => export.write_to_dir(Path::new("."))?,
    };

    eprintln!("wrote {}", path.display());
    Ok(())
}
