use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use calview_core::ViewMode;
use calview_core::event::parse_event_time;
use chrono::NaiveDateTime;
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV_VAR: &str = "CALVIEW_CONFIG";
const CONFIG_DIR_NAME: &str = "calview";
const CONFIG_FILE_NAME: &str = "calview.toml";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "calview",
    version,
    about = "Day, week, month and agenda calendar views for the terminal"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Calendar config file (TOML)
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Events file (.toml with [[events]] tables, or a .json array)
    #[arg(long = "events")]
    pub events: Option<PathBuf>,

    /// View to open: none, day, week, month or year
    #[arg(
        long = "view",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<ViewMode>())
    )]
    pub view: Option<ViewMode>,

    /// Anchor date, YYYY-MM-DD or YYYY-MM-DDTHH:MM
    #[arg(
        long = "date",
        value_parser = clap::builder::ValueParser::new(parse_anchor)
    )]
    pub date: Option<NaiveDateTime>,

    /// Hotkey to replay before rendering (repeatable), e.g. ArrowRight
    #[arg(long = "key", action = ArgAction::Append)]
    pub keys: Vec<String>,

    /// Show details of the event with this id
    #[arg(long = "click")]
    pub click: Option<String>,
}

fn parse_anchor(raw: &str) -> anyhow::Result<NaiveDateTime> {
    parse_event_time(raw).ok_or_else(|| anyhow!("expected YYYY-MM-DD[THH:MM], got: {raw}"))
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

/// Flag first, then `CALVIEW_CONFIG` (`/dev/null` disables), then the
/// user config directory. `None` means built-in defaults.
#[tracing::instrument(skip(override_path))]
pub fn resolve_config_path(override_path: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = override_path {
        return Ok(Some(path.to_path_buf()));
    }

    if let Ok(raw) = std::env::var(CONFIG_ENV_VAR) {
        let trimmed = raw.trim();
        if trimmed == "/dev/null" {
            return Ok(None);
        }
        if !trimmed.is_empty() {
            return Ok(Some(PathBuf::from(trimmed)));
        }
    }

    let Some(config_dir) = dirs::config_dir() else {
        debug!("no user config directory; using defaults");
        return Ok(None);
    };
    let candidate = config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
    if candidate.exists() {
        return Ok(Some(candidate));
    }

    Ok(None)
}
