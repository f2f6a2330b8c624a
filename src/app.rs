use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Position},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};

use crate::config::Config;
use crate::meteo::{self, FetchError, ForecastDay};
use crate::symbols;

const PLACEHOLDER: &str = "Search for location...";

/// Messages emitted by a background fetch. The location label arrives as
/// soon as geocoding succeeds, before the forecast call, so the header can
/// update even if the second request fails.
pub enum FetchEvent {
    Located(String),
    Forecast(Vec<ForecastDay>),
    Failed(FetchError),
}

type Fetcher = fn(String, Sender<FetchEvent>);

/// Session state. The app is the only writer; renderers get `&App`.
pub struct App {
    pub query: String,
    pub is_loading: bool,
    pub display_location: String,
    pub forecast: Vec<ForecastDay>,
    store_path: Option<PathBuf>,
    events: Receiver<FetchEvent>,
    sender: Sender<FetchEvent>,
    fetcher: Fetcher,
}

impl App {
    pub fn new(store_path: Option<PathBuf>) -> Self {
        Self::with_fetcher(store_path, spawn_fetch)
    }

    pub fn with_fetcher(store_path: Option<PathBuf>, fetcher: Fetcher) -> Self {
        let (sender, events) = mpsc::channel();
        Self {
            query: String::new(),
            is_loading: false,
            display_location: String::new(),
            forecast: Vec::new(),
            store_path,
            events,
            sender,
            fetcher,
        }
    }

    /// The one transition driving the app: persist the new query, then kick
    /// off a fetch. Works the same for keystrokes and programmatic updates.
    pub fn set_query(&mut self, query: String) {
        if query == self.query {
            return;
        }
        self.query = query;
        self.persist_query();
        self.request_forecast();
    }

    pub fn push_char(&mut self, c: char) {
        let mut query = self.query.clone();
        query.push(c);
        self.set_query(query);
    }

    pub fn pop_char(&mut self) {
        let mut query = self.query.clone();
        query.pop();
        self.set_query(query);
    }

    fn persist_query(&self) {
        let Some(path) = &self.store_path else { return };
        let cfg = Config {
            location: self.query.clone(),
        };
        if let Err(err) = cfg.save_to(path) {
            tracing::warn!("failed to persist location: {err:#}");
        }
    }

    fn request_forecast(&mut self) {
        // Below two characters a lookup is meaningless; clear instead of
        // firing a request on the first keystroke.
        if self.query.chars().count() < 2 {
            self.forecast.clear();
            return;
        }
        self.is_loading = true;
        (self.fetcher)(self.query.clone(), self.sender.clone());
    }

    /// Apply one fetch event. Overlapping fetches are not cancelled; a later
    /// completion simply overwrites whatever an earlier one wrote.
    pub fn apply(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Located(label) => self.display_location = label,
            FetchEvent::Forecast(days) => {
                self.forecast = days;
                self.is_loading = false;
            }
            FetchEvent::Failed(err) => {
                tracing::warn!("forecast fetch failed: {err}");
                self.forecast.clear();
                self.is_loading = false;
            }
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
        }
    }
}

/// Run both network calls off the UI thread, reporting progress over the
/// channel. Send errors mean the app is shutting down and are ignored.
fn spawn_fetch(query: String, events: Sender<FetchEvent>) {
    thread::spawn(move || {
        let place = match meteo::geocode(&query) {
            Ok(place) => place,
            Err(err) => {
                let _ = events.send(FetchEvent::Failed(err));
                return;
            }
        };

        let _ = events.send(FetchEvent::Located(location_label(&place)));

        match meteo::daily_forecast(&place) {
            Ok(days) => {
                let _ = events.send(FetchEvent::Forecast(days));
            }
            Err(err) => {
                let _ = events.send(FetchEvent::Failed(err));
            }
        }
    });
}

/// Header label for a resolved place: its name plus the country flag.
fn location_label(place: &meteo::Place) -> String {
    format!(
        "{} {}",
        place.name,
        symbols::country_flag(&place.country_code)
    )
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        app.drain_events();

        terminal.draw(|f| ui(f, &app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(())
                }
                KeyCode::Char(c) => app.push_char(c),
                KeyCode::Backspace => app.pop_char(),
                _ => {}
            }
        }
    }
}

fn display_search_input(app: &App) -> Paragraph<'_> {
    let text = if app.query.is_empty() {
        Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(app.query.as_str(), Style::default().fg(Color::Green))
    };
    Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Location ", Style::default().fg(Color::Yellow)))
            .title_alignment(Alignment::Left)
            .border_style(Style::default().fg(Color::Cyan))
            .border_type(BorderType::Rounded),
    )
}

fn display_day(day: &ForecastDay, is_today: bool) -> ListItem<'static> {
    let label = if is_today {
        "Today".to_string()
    } else {
        symbols::short_weekday(day.date)
    };
    let range = format!(
        "{}\u{b0} \u{2014} {}\u{b0}",
        day.t_min.floor() as i64,
        day.t_max.ceil() as i64
    );
    ListItem::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(format!(" {}  ", symbols::weather_icon(day.code))),
            Span::styled(
                format!("{label:<7}"),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(range, Style::default().fg(Color::Green)),
        ]),
    ])
}

fn display_forecast(app: &App) -> List<'static> {
    let items: Vec<ListItem> = app
        .forecast
        .iter()
        .enumerate()
        .map(|(i, day)| display_day(day, i == 0))
        .collect();

    List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                format!(" Weather {} ", app.display_location),
                Style::default().fg(Color::Yellow),
            ))
            .title_alignment(Alignment::Left)
            .border_style(Style::default().fg(Color::Cyan))
            .border_type(BorderType::Rounded),
    )
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(f.area());

    f.render_widget(display_search_input(app), chunks[0]);
    f.set_cursor_position(Position::new(
        chunks[0].x + 1 + app.query.chars().count() as u16,
        chunks[0].y + 1,
    ));

    if app.is_loading {
        let loader = Paragraph::new(Span::styled(
            " Loading...",
            Style::default().fg(Color::Yellow),
        ));
        f.render_widget(loader, chunks[1]);
    }

    if !app.forecast.is_empty() {
        f.render_widget(display_forecast(app), chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // Stands in for the network: echoes the query back as the label.
    fn echo_fetcher(query: String, events: Sender<FetchEvent>) {
        let _ = events.send(FetchEvent::Located(query));
    }

    fn day(d: u32, code: i64) -> ForecastDay {
        ForecastDay {
            date: NaiveDate::from_ymd_opt(2026, 8, d).unwrap(),
            code,
            t_min: 11.4,
            t_max: 23.6,
        }
    }

    #[test]
    fn short_query_never_fetches() {
        let mut app = App::with_fetcher(None, echo_fetcher);
        app.set_query("B".to_string());

        assert!(!app.is_loading);
        assert!(app.events.try_recv().is_err());
    }

    #[test]
    fn short_query_clears_stale_forecast() {
        let mut app = App::with_fetcher(None, echo_fetcher);
        app.forecast = vec![day(30, 0)];

        app.pop_char();
        assert!(app.forecast.is_empty());
    }

    #[test]
    fn query_change_enters_loading_and_fetches() {
        let mut app = App::with_fetcher(None, echo_fetcher);
        app.set_query("Berlin".to_string());

        assert!(app.is_loading);
        app.drain_events();
        assert_eq!(app.display_location, "Berlin");
    }

    #[test]
    fn unchanged_query_is_a_noop() {
        let mut app = App::with_fetcher(None, echo_fetcher);
        app.set_query("Berlin".to_string());
        app.drain_events();
        app.set_query("Berlin".to_string());

        assert!(app.events.try_recv().is_err());
    }

    #[test]
    fn forecast_event_settles_loading() {
        let mut app = App::with_fetcher(None, echo_fetcher);
        app.set_query("Berlin".to_string());

        app.apply(FetchEvent::Forecast(vec![day(30, 3), day(31, 61)]));
        assert!(!app.is_loading);
        assert_eq!(app.forecast.len(), 2);
        assert_eq!(app.forecast[0].code, 3);
    }

    #[test]
    fn failure_clears_forecast_but_keeps_label() {
        let mut app = App::with_fetcher(None, echo_fetcher);
        app.set_query("Berlin".to_string());
        app.drain_events();
        app.apply(FetchEvent::Forecast(vec![day(30, 3)]));

        app.apply(FetchEvent::Failed(FetchError::NotFound));
        assert!(!app.is_loading);
        assert!(app.forecast.is_empty());
        assert_eq!(app.display_location, "Berlin");
    }

    #[test]
    fn later_completion_overwrites_earlier() {
        let mut app = App::with_fetcher(None, echo_fetcher);
        app.apply(FetchEvent::Forecast(vec![day(30, 0)]));
        app.apply(FetchEvent::Forecast(vec![day(30, 95), day(31, 96)]));

        assert_eq!(app.forecast.len(), 2);
        assert_eq!(app.forecast[0].code, 95);
    }

    #[test]
    fn resolved_label_carries_the_flag() {
        let place = meteo::Place {
            name: "Berlin".to_string(),
            latitude: 52.52437,
            longitude: 13.41053,
            timezone: "Europe/Berlin".to_string(),
            country_code: "DE".to_string(),
        };
        let label = location_label(&place);
        assert!(label.starts_with("Berlin "));
        assert!(label.ends_with("\u{1f1e9}\u{1f1ea}"));
    }

    #[test]
    fn set_query_persists_to_store() {
        let path = std::env::temp_dir().join(format!(
            "omw-test-{}-persist.toml",
            std::process::id()
        ));
        let mut app = App::with_fetcher(Some(path.clone()), echo_fetcher);
        app.set_query("Lisbon".to_string());

        let stored = Config::load_from(&path).unwrap();
        assert_eq!(stored.location, "Lisbon");

        let _ = std::fs::remove_file(&path);
    }
}
