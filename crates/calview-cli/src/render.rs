use std::io::Write;

use calview_core::grid::{DayHours, MonthGrid, WeekColumns, MONTH_GRID_COLUMNS};
use calview_core::label::{hour_label, ChronoFormatter, Labels};
use calview_core::{CalendarConfig, CalendarViewState, Event, EventColor, ViewGrid, ViewMode};
use chrono::{Datelike, NaiveDate};
use unicode_width::UnicodeWidthStr;

/// How many events a month cell hides behind its "+N" badge.
pub fn overflow_count(total: usize, shown: usize) -> usize {
    total.saturating_sub(shown)
}

pub struct Renderer {
    color: bool,
    visible_events: usize,
    hour_start: u32,
    hour_end: u32,
    labels: Labels<ChronoFormatter>,
}

impl Renderer {
    pub fn new(cfg: &CalendarConfig, color: bool) -> Self {
        Self {
            color,
            visible_events: cfg.month.visible_events,
            hour_start: cfg.day_view.hour_start,
            hour_end: cfg.day_view.hour_end,
            labels: Labels::new(ChronoFormatter, cfg.locale()),
        }
    }

    #[tracing::instrument(skip_all, fields(view = %state.view()))]
    pub fn render<W: Write>(&self, state: &CalendarViewState, mut out: W) -> anyhow::Result<()> {
        if state.view() != ViewMode::None {
            writeln!(
                out,
                "{} | {}",
                state.view().label(),
                self.labels.current_date_label(state.view(), state.anchor())
            )?;
            writeln!(out)?;
        }

        match state.grid() {
            ViewGrid::None => {
                writeln!(out, "No view selected (m: month, w: week, d: day, y: year)")?;
            }
            ViewGrid::Day(hours) => self.render_day(state, &hours, &mut out)?,
            ViewGrid::Week(columns) => self.render_week(state, &columns, &mut out)?,
            ViewGrid::Month(cells) => self.render_month(state, &cells, &mut out)?,
            ViewGrid::Year(months) => {
                self.render_year_summary(state, &months, &mut out)?;
                writeln!(out)?;
                self.render_agenda(state, &mut out)?;
            }
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, out))]
    pub fn print_event_info<W: Write>(&self, event: &Event, mut out: W) -> anyhow::Result<()> {
        writeln!(out, "id        {}", event.id)?;
        writeln!(out, "title     {}", self.paint(&event.title, event.color))?;
        writeln!(out, "start     {}", event.start.format("%Y-%m-%d %H:%M"))?;
        writeln!(out, "end       {}", event.end.format("%Y-%m-%d %H:%M"))?;
        writeln!(out, "duration  {}m", event.duration_minutes())?;
        writeln!(out, "color     {}", event.color.as_key())?;
        Ok(())
    }

    fn render_day<W: Write>(
        &self,
        state: &CalendarViewState,
        hours: &DayHours,
        out: &mut W,
    ) -> anyhow::Result<()> {
        let date = state.anchor().date();
        writeln!(out, "{}", self.day_heading(state, date))?;

        for cell in self.visible_hours(hours) {
            let entries = state
                .hour_slots(cell.start())
                .iter()
                .map(|slot| {
                    format!(
                        "{} [top {:.0}% / height {:.0}%]",
                        self.paint(&slot.event.title, slot.event.color),
                        slot.top_percent,
                        slot.height_percent
                    )
                })
                .collect::<Vec<_>>();
            writeln!(out, "{:>7} | {}", hour_label(cell.hour), entries.join("  "))?;
        }

        Ok(())
    }

    fn render_week<W: Write>(
        &self,
        state: &CalendarViewState,
        columns: &WeekColumns,
        out: &mut W,
    ) -> anyhow::Result<()> {
        let mut headers = vec!["Hora".to_string()];
        headers.extend(
            columns
                .iter()
                .map(|hours| self.day_heading(state, hours[0].date)),
        );

        let rows = self
            .visible_hours(&columns[0])
            .map(|first| {
                let mut row = vec![hour_label(first.hour)];
                let cells = columns
                    .iter()
                    .filter_map(|hours| hours.get(first.hour as usize));
                row.extend(cells.map(|cell| {
                    state
                        .hour_slots(cell.start())
                        .iter()
                        .map(|slot| self.paint(&slot.event.title, slot.event.color))
                        .collect::<Vec<_>>()
                        .join(", ")
                }));
                row
            })
            .collect::<Vec<_>>();

        write_table(out, headers, rows)
    }

    fn render_month<W: Write>(
        &self,
        state: &CalendarViewState,
        cells: &MonthGrid,
        out: &mut W,
    ) -> anyhow::Result<()> {
        let headers = self.labels.weekday_headers().to_vec();
        let today = state.today().date();

        let rows = cells
            .chunks(MONTH_GRID_COLUMNS)
            .map(|week| {
                week.iter()
                    .map(|cell| {
                        let slot = state.day_slot(cell.date);
                        let mut text = if cell.in_current_month {
                            format!("{:>2}", cell.date.day())
                        } else {
                            format!("({})", cell.date.day())
                        };
                        if cell.date == today {
                            text.push('*');
                        }
                        for event in slot.events.iter().take(self.visible_events) {
                            text.push(' ');
                            text.push_str(&self.paint(&event.title, event.color));
                        }
                        let hidden = overflow_count(slot.total, self.visible_events);
                        if hidden > 0 {
                            text.push_str(&format!(" +{hidden}"));
                        }
                        text
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        write_table(out, headers, rows)
    }

    fn render_year_summary<W: Write>(
        &self,
        state: &CalendarViewState,
        months: &[MonthGrid; 12],
        out: &mut W,
    ) -> anyhow::Result<()> {
        for month in months {
            let in_month = month.iter().filter(|cell| cell.in_current_month);
            let Some(first) = month.iter().find(|cell| cell.in_current_month) else {
                continue;
            };
            let total: usize = in_month.map(|cell| state.day_slot(cell.date).total).sum();
            let name = self
                .labels
                .month_label(first.date.and_time(chrono::NaiveTime::MIN));
            writeln!(out, "{name:<12} {total:>3} events")?;
        }
        Ok(())
    }

    fn render_agenda<W: Write>(&self, state: &CalendarViewState, out: &mut W) -> anyhow::Result<()> {
        let days = state.agenda();
        if days.is_empty() {
            writeln!(out, "No events in this period.")?;
            return Ok(());
        }

        for day in days {
            writeln!(out, "{}", self.day_heading(state, day.date))?;
            for event in day.events {
                writeln!(
                    out,
                    "  {}-{}  {}",
                    event.start.format("%H:%M"),
                    event.end.format("%H:%M"),
                    self.paint(&event.title, event.color)
                )?;
            }
        }
        Ok(())
    }

    fn visible_hours<'a>(&self, hours: &'a DayHours) -> impl Iterator<Item = &'a calview_core::HourCell> {
        let (start, end) = (self.hour_start, self.hour_end);
        hours
            .iter()
            .filter(move |cell| cell.hour >= start && cell.hour <= end)
    }

    fn day_heading(&self, state: &CalendarViewState, date: NaiveDate) -> String {
        let label = self.labels.day_column_label(date);
        if date == state.today().date() {
            self.paint_code(&label, "1")
        } else {
            label
        }
    }

    fn paint(&self, text: &str, color: EventColor) -> String {
        let code = match color {
            EventColor::Default => "36",
            EventColor::Blue => "34",
            EventColor::Green => "32",
            EventColor::Pink => "95",
            EventColor::Purple => "35",
        };
        self.paint_code(text, code)
    }

    fn paint_code(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let mut widths = headers
        .iter()
        .map(|header| visible_width(header))
        .collect::<Vec<_>>();

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(visible_width(cell));
        }
    }

    for (header, width) in headers.iter().zip(&widths) {
        write!(writer, "{}{} ", header, " ".repeat(width - visible_width(header)))?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (cell, width) in row.iter().zip(&widths) {
            let padding = width.saturating_sub(visible_width(cell));
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn visible_width(text: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(text).as_str())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
