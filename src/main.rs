use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use recite::app::App;
use recite::config::{Config, MAX_FEEDBACK_PAUSE_MS};
use recite::ui::commands::CommandTable;
use recite::ui::console::{Console, TerminalConsole};
use recite::ui::repl;

#[derive(Parser)]
#[command(name = "recite", version, about = "Memorize passages with progressive blanking and spaced repetition")]
struct Cli {
    #[arg(short, long, help = "Passage data file")]
    data: Option<PathBuf>,

    #[arg(short, long, help = "Config file (default: <config dir>/recite/config.toml)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Pause after drill feedback, in milliseconds")]
    pause_ms: Option<u64>,

    #[arg(long, help = "Do not clear the screen between drill turns")]
    no_clear: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_init(&Config::config_path()).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable config: {e:#}");
            Config::default()
        }),
    };
    if let Some(data) = cli.data {
        config.data_file = data.to_string_lossy().to_string();
    }
    if let Some(ms) = cli.pause_ms {
        config.feedback_pause_ms = ms.min(MAX_FEEDBACK_PAUSE_MS);
    }
    if cli.no_clear {
        config.clear_screen = false;
    }

    let mut app = App::open(config);
    let table = CommandTable::new();
    let mut console = TerminalConsole::new();

    console.write_line(&format!(
        "{} passage(s) loaded. Type \"help\" for commands.",
        app.library.len()
    ))?;
    repl::run(&mut app, &table, &mut console)?;
    Ok(())
}
