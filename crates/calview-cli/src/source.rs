use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow};
use calview_core::event::event_time_serde;
use calview_core::{Event, EventColor};
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFormat {
    Toml,
    Json,
}

impl EventFormat {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            other => Err(anyhow!(
                "unsupported events file extension {:?} for {}",
                other.unwrap_or(""),
                path.display()
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(with = "event_time_serde")]
    start: NaiveDateTime,
    #[serde(with = "event_time_serde")]
    end: NaiveDateTime,
    #[serde(default)]
    color: EventColor,
}

#[derive(Debug, Deserialize)]
struct EventsDocument {
    #[serde(default)]
    events: Vec<EventRecord>,
}

impl From<EventRecord> for Event {
    fn from(record: EventRecord) -> Self {
        let id = record
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Event::new(id, record.title, record.start, record.end).with_color(record.color)
    }
}

#[tracing::instrument]
pub fn load_events(path: &Path) -> anyhow::Result<Vec<Event>> {
    let format = EventFormat::from_path(path)?;
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let events = parse_events(&raw, format)
        .with_context(|| format!("failed to parse events from {}", path.display()))?;
    info!(file = %path.display(), count = events.len(), "loaded events");
    Ok(events)
}

pub fn parse_events(raw: &str, format: EventFormat) -> anyhow::Result<Vec<Event>> {
    let records = match format {
        EventFormat::Toml => toml::from_str::<EventsDocument>(raw)?.events,
        EventFormat::Json => serde_json::from_str::<Vec<EventRecord>>(raw)?,
    };
    debug!(?format, count = records.len(), "parsed event records");
    Ok(records.into_iter().map(Event::from).collect())
}
