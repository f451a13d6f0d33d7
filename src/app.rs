// App state and main event loop.
// Owns the stores, spawns searches, and applies their results to the screen state.

use std::io;
use std::sync::Arc;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::Result;
use crate::favorites::FavoritesStore;
use crate::location::{Geolocator, LocateOptions, Locator};
use crate::preferences::{PreferencesStore, Theme};
use crate::render::WeatherCard;
use crate::retrieval::{Outcome, Retrieval, Retriever};
use crate::state::{FavoritesPanel, StatusLine};
use crate::storage::SharedStore;
use crate::ui;
use crate::weather::{Query, WeatherClient};

/// Whether keystrokes go to the search box or to commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Results delivered back from spawned lookups.
#[derive(Debug)]
pub enum Message {
    Searched(Retrieval),
    Located(Retrieval),
}

/// Main application state.
pub struct App {
    retriever: Arc<Retriever<WeatherClient>>,
    geolocator: Arc<Geolocator<Locator>>,
    favorites: FavoritesStore,
    preferences: PreferencesStore,
    /// Active color theme.
    pub theme: Theme,
    /// Search box contents.
    pub input: String,
    pub input_mode: InputMode,
    /// Last rendered weather, kept when later lookups fail.
    pub card: Option<WeatherCard>,
    /// City the card shows, used for the favorite star. `None` when the API gave no name.
    pub current_city: Option<String>,
    /// Query behind the card, repeated on refresh.
    last_query: Option<Query>,
    pub is_favorite: bool,
    pub favorites_panel: FavoritesPanel,
    pub status: StatusLine,
    /// Searches still in flight.
    pub pending: usize,
    /// A location lookup is in flight.
    pub locating: bool,
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
}

impl App {
    /// Wire up the client, stores, and location provider from config.
    pub fn new(config: &Config, store: SharedStore) -> Result<Self> {
        let cache = CacheStore::new(store.clone(), config.cache_ttl());
        let client = WeatherClient::new(
            &config.api_key,
            &config.api_base,
            cache,
            config.request_timeout(),
        )?;
        let retriever = Retriever::new(client, config.default_city.clone())
            .with_location_fallback(config.geolocation.fallback_to_default_city);

        let locator = Locator::from_config(&config.geolocation)?;
        let geolocator = Geolocator::new(locator, LocateOptions::from(&config.geolocation));

        Ok(Self::with_parts(
            retriever,
            geolocator,
            FavoritesStore::new(store.clone()),
            PreferencesStore::new(store, config.default_city.clone()),
        ))
    }

    pub fn with_parts(
        retriever: Retriever<WeatherClient>,
        geolocator: Geolocator<Locator>,
        favorites: FavoritesStore,
        preferences: PreferencesStore,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let theme = preferences.theme();
        let favorites_panel = FavoritesPanel::new(favorites.list());

        Self {
            retriever: Arc::new(retriever),
            geolocator: Arc::new(geolocator),
            favorites,
            preferences,
            theme,
            input: String::new(),
            input_mode: InputMode::Normal,
            card: None,
            current_city: None,
            last_query: None,
            is_favorite: false,
            favorites_panel,
            status: StatusLine::default(),
            pending: 0,
            locating: false,
            show_help: false,
            should_quit: false,
            tx,
            rx,
        }
    }

    /// Load the last searched city (or the default one).
    pub fn start(&mut self) {
        let city = self.preferences.last_city();
        self.input = city.clone();
        self.search(&city);
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            self.drain_messages();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.input_mode {
            InputMode::Editing => self.handle_editing_key(key),
            InputMode::Normal if self.show_help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                    self.show_help = false;
                }
            }
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.submit_search();
            }
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') | KeyCode::Char('s') | KeyCode::Char('i') => {
                self.input_mode = InputMode::Editing;
            }
            KeyCode::Char('f') | KeyCode::Char('*') => self.toggle_current_favorite(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('g') => self.locate(),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Down | KeyCode::Char('j') => self.favorites_panel.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.favorites_panel.select_prev(),
            KeyCode::Enter => self.open_selected_favorite(),
            KeyCode::Char('d') | KeyCode::Delete => self.remove_selected_favorite(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    /// Search the city typed in the search box and remember it.
    pub fn submit_search(&mut self) {
        let city = self.input.trim().to_string();
        if city.is_empty() {
            return;
        }

        if let Err(e) = self.preferences.set_last_city(&city) {
            tracing::warn!(error = %e, "failed to save last city");
        }
        self.search(&city);
    }

    /// Start a city lookup in the background.
    pub fn search(&mut self, city: &str) {
        self.spawn_search(Query::city(city));
    }

    fn spawn_search(&mut self, query: Query) {
        let target = match &query {
            Query::City(name) => name.trim().to_string(),
            Query::Coordinates(_) => "your location".to_string(),
        };
        self.status = StatusLine::info(format!("Loading weather for {}...", target));
        self.pending += 1;

        let retriever = Arc::clone(&self.retriever);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let retrieval = match query {
                Query::City(name) => retriever.search_city(&name).await,
                Query::Coordinates(coords) => retriever.search_coordinates(coords).await,
            };
            let _ = tx.send(Message::Searched(retrieval));
        });
    }

    /// Start a current-location lookup unless one is already running.
    pub fn locate(&mut self) {
        if self.locating {
            return;
        }
        self.locating = true;
        self.status = StatusLine::info("Detecting your location...");

        let retriever = Arc::clone(&self.retriever);
        let geolocator = Arc::clone(&self.geolocator);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let retrieval = retriever.search_current_location(&geolocator).await;
            let _ = tx.send(Message::Located(retrieval));
        });
    }

    /// Repeat the query behind the card, or search the last city if nothing is shown.
    pub fn refresh(&mut self) {
        let query = self
            .last_query
            .clone()
            .unwrap_or_else(|| Query::city(self.preferences.last_city()));
        self.spawn_search(query);
    }

    /// Apply every finished lookup, oldest first. The newest one wins.
    pub fn drain_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message);
        }
    }

    pub fn apply(&mut self, message: Message) {
        let retrieval = match message {
            Message::Searched(retrieval) => {
                self.pending = self.pending.saturating_sub(1);
                retrieval
            }
            Message::Located(retrieval) => {
                self.locating = false;
                retrieval
            }
        };

        if let Some(report) = retrieval.report() {
            self.card = Some(WeatherCard::from_report(report, Local::now()));
            self.current_city = report.location_name().map(str::to_string);
            self.last_query = match &retrieval.outcome {
                Outcome::DefaultCity(_) => Some(Query::city(&retrieval.default_city)),
                _ => retrieval.query.clone(),
            };
            self.update_star();
        }
        self.status = retrieval.status();
    }

    /// Toggle the city shown on the card.
    pub fn toggle_current_favorite(&mut self) {
        let Some(city) = self.current_city.clone() else {
            return;
        };
        self.toggle_favorite(&city);
    }

    fn toggle_favorite(&mut self, city: &str) {
        match self.favorites.toggle(city) {
            Ok(true) => self.status = StatusLine::info(format!("\"{}\" saved.", city)),
            Ok(false) => self.status = StatusLine::info(format!("\"{}\" removed.", city)),
            Err(e) => {
                tracing::error!(error = %e, "failed to update favorites");
                self.status = StatusLine::error(format!("Could not update favorites: {}", e));
            }
        }
        self.favorites_panel.set_items(self.favorites.list());
        self.update_star();
    }

    pub fn open_selected_favorite(&mut self) {
        let Some(city) = self.favorites_panel.selected().map(str::to_string) else {
            return;
        };
        self.input = city.clone();
        self.search(&city);
    }

    pub fn remove_selected_favorite(&mut self) {
        let Some(city) = self.favorites_panel.selected().map(str::to_string) else {
            return;
        };
        self.toggle_favorite(&city);
    }

    pub fn toggle_theme(&mut self) {
        match self.preferences.toggle_theme() {
            Ok(theme) => self.theme = theme,
            Err(e) => {
                tracing::warn!(error = %e, "failed to save theme");
                self.theme = self.theme.toggled();
            }
        }
    }

    fn update_star(&mut self) {
        self.is_favorite = self
            .current_city
            .as_deref()
            .is_some_and(|city| self.favorites.contains(city));
    }
}
