pub mod cli;
pub mod render;
pub mod source;

use std::ffi::OsString;
use std::io::{self, IsTerminal};

use anyhow::{Context, anyhow};
use calview_core::{CalendarConfig, CalendarViewState};
use clap::Parser;
use tracing::{debug, info, warn};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(verbose = cli.verbose, quiet = cli.quiet, "starting calview");

    let cfg = match cli::resolve_config_path(cli.config.as_deref())? {
        Some(path) => CalendarConfig::load(&path)?,
        None => {
            debug!("no config file; using defaults");
            CalendarConfig::default()
        }
    };

    let events = match cli.events.as_deref() {
        Some(path) => source::load_events(path).context("failed to load events")?,
        None => Vec::new(),
    };

    let today = cfg.now();
    let mut state = CalendarViewState::new(today, events)
        .with_view(cli.view.unwrap_or(cfg.default_view))
        .with_anchor(cli.date.unwrap_or(today))
        .on_change_view(|view| debug!(%view, "view change notified"))
        .on_event_click(|event| debug!(id = %event.id, "event click notified"));

    for rejected in state.rejected() {
        eprintln!("warning: skipped event {}: {}", rejected.id, rejected.reason);
    }

    let keys = cfg.key_bindings();
    for key in &cli.keys {
        match keys.resolve(key) {
            Some(command) => {
                let snap = state.apply(command);
                debug!(key = %key, view = %snap.view, anchor = %snap.anchor, "replayed key");
            }
            None => warn!(key = %key, "key is not bound or hotkeys are disabled; ignoring"),
        }
    }

    let renderer = render::Renderer::new(&cfg, io::stdout().is_terminal());
    let mut out = io::stdout().lock();

    if let Some(id) = cli.click.as_deref() {
        let event = state
            .click_event(id)
            .ok_or_else(|| anyhow!("no event with id {id}"))?;
        renderer.print_event_info(event, &mut out)?;
        return Ok(());
    }

    renderer.render(&state, &mut out)?;

    info!("done");
    Ok(())
}
