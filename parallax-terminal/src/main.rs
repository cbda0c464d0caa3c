/// Parallax Terminal - scroll-driven toon scene in the terminal
///
/// Controls:
///   - Mouse: Parallax
///   - Wheel / J,K / Arrows / PgUp,PgDn / Home,End: Scroll through sections
///   - M/P: Cycle material / particle colour
///   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use parallax_core::{SceneConfig, Variant};
use parallax_terminal::{load_gradient, DeferredLog, TerminalApp};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Scroll-driven toon scene rendered in the terminal")]
struct Args {
    /// Scene variant: "classic" or "sections"
    #[arg(long, default_value_t = Variant::Sections)]
    variant: Variant,

    /// Gradient image for toon shading (overrides the config's gradient_url)
    #[arg(long)]
    gradient: Option<PathBuf>,

    /// JSON scene config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target frame rate
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

fn main() -> anyhow::Result<()> {
    let log = DeferredLog::new();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(log.clone())))
        .init();
    let args = Args::parse();

    let result = run(args);
    // Records written while the alternate screen was up
    let _ = std::io::stderr().write_all(&log.take());
    result
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SceneConfig::from_json(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => SceneConfig::default(),
    };

    let gradient = args
        .gradient
        .clone()
        .or_else(|| config.gradient_url.as_ref().map(PathBuf::from))
        .and_then(|path| load_gradient(&path));

    let mut app = TerminalApp::new(config, args.variant, gradient, args.fps)
        .context("failed to query terminal size")?;
    app.run()?;

    println!("Thank you for scrolling through Parallax!");
    Ok(())
}
