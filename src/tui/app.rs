use crate::catalog::Catalog;
use crate::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::logging;
use crate::query::{CatalogEngine, QueryOutcome, SortKey};
use crate::tui::filters::FilterPanel;
use crate::tui::search::SearchState;
use crate::tui::table::TableState;
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::time::{Duration, Instant};

/// Tunables for the interactive browser
#[derive(Debug, Clone)]
pub struct BrowseConfig {
    /// UI tick rate
    pub tick_rate: Duration,
    /// Search debounce window
    pub debounce_window: Duration,
    /// Per-row delay of the staggered reveal after a recompute
    pub reveal_stagger: Duration,
    /// How long a cart notification stays on screen
    pub notification_lifetime: Duration,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(50),
            debounce_window: SEARCH_DEBOUNCE,
            reveal_stagger: Duration::from_millis(50),
            notification_lifetime: Duration::from_secs(3),
        }
    }
}

/// Which pane owns keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Filters,
    Table,
}

/// A transient banner, auto-dismissed after its deadline
pub struct Notification {
    pub text: String,
    pub expires: Instant,
}

pub struct App {
    // Data
    pub engine: CatalogEngine,
    pub catalog_source: String,
    /// Insertion indices of the visible records, in display order
    pub rows: Vec<usize>,

    // Sub-states
    pub search: SearchState,
    pub filters: FilterPanel,
    pub table: TableState,
    pub focus: Focus,

    // Informational state
    pub status_message: String,
    pub no_results: bool,
    pub notification: Option<Notification>,

    // Timing
    debouncer: Debouncer,
    reveal_started: Option<Instant>,
    config: BrowseConfig,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    pub fn new(catalog: Catalog, config: BrowseConfig) -> Self {
        let catalog_source = catalog.source.clone();
        let engine = CatalogEngine::new(catalog.into_records());
        let rows = engine.visible_indices();
        let status_message = format!("{} produtos", rows.len());

        Self {
            engine,
            catalog_source,
            rows,
            search: SearchState::default(),
            filters: FilterPanel::default(),
            table: TableState::default(),
            focus: Focus::Search,
            status_message,
            no_results: false,
            notification: None,
            debouncer: Debouncer::new(config.debounce_window),
            reveal_started: None,
            config,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<impl Backend<Error = std::io::Error>>) -> crate::Result<()> {
        let tick_rate = self.config.tick_rate;
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(Event::Key(key)) = event::read() {
                    self.handle_key(key);
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.on_tick(Instant::now());
                last_tick = Instant::now();
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Timer-driven work: settled search input and notification expiry
    fn on_tick(&mut self, now: Instant) {
        if let Some(term) = self.debouncer.poll(now) {
            self.run_search(&term, now);
        }

        if let Some(notification) = &self.notification {
            if now >= notification.expires {
                self.notification = None;
            }
        }
    }

    fn run_search(&mut self, raw_term: &str, now: Instant) {
        let outcome = self.engine.apply_search(raw_term);
        logging::log_search(
            &self.engine.query().search_term,
            outcome.visible_count,
            self.engine.records().len(),
        );
        self.after_recompute(outcome, now);
    }

    fn run_filters(&mut self, now: Instant) {
        let filters = self.filters.active_filters();
        let outcome = self.engine.apply_filters(filters);
        let applied = &self.engine.query().filters;
        logging::log_filters(
            &applied.amperage,
            &applied.category,
            &applied.line,
            outcome.visible_count,
        );
        self.after_recompute(outcome, now);
    }

    fn set_sort(&mut self, key: SortKey, now: Instant) {
        if self.engine.query().sort == key {
            return;
        }
        self.engine.apply_sort(key);
        logging::log_sort(key.token());
        self.rows = self.engine.visible_indices();
        self.table.reset(self.rows.len());
        // Cosmetic stagger only; a later interaction restarts it
        // without waiting for the previous one to finish.
        self.reveal_started = Some(now);
        self.status_message = format!("Ordenado por {}", key.label());
    }

    fn after_recompute(&mut self, outcome: QueryOutcome, now: Instant) {
        self.rows = self.engine.visible_indices();
        self.no_results = outcome.no_results;
        self.table.reset(self.rows.len());
        self.reveal_started = Some(now);
        self.status_message = if outcome.no_results {
            "Nenhum produto encontrado".to_string()
        } else {
            format!(
                "{} de {} produtos",
                outcome.visible_count,
                self.engine.records().len()
            )
        };
    }

    /// Has the staggered reveal reached this visual row yet?
    pub fn row_revealed(&self, visual_index: usize, now: Instant) -> bool {
        match self.reveal_started {
            Some(started) => now >= started + self.config.reveal_stagger * visual_index as u32,
            None => true,
        }
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        let now = Instant::now();

        // Global keys
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Search => Focus::Filters,
                    Focus::Filters => Focus::Table,
                    Focus::Table => Focus::Search,
                };
                return;
            }
            // Sort keys work from any pane
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let next = self.engine.query().sort.next();
                return self.set_sort(next, now);
            }
            KeyCode::F(1) => return self.set_sort(SortKey::Relevance, now),
            KeyCode::F(2) => return self.set_sort(SortKey::PriceLow, now),
            KeyCode::F(3) => return self.set_sort(SortKey::PriceHigh, now),
            KeyCode::F(4) => return self.set_sort(SortKey::Rating, now),
            _ => {}
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key, now),
            Focus::Filters => self.handle_filter_key(key, now),
            Focus::Table => self.handle_table_key(key, now),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.insert(c);
                self.debouncer.submit(self.search.query.clone(), now);
            }
            KeyCode::Backspace => {
                if self.search.backspace() {
                    self.debouncer.submit(self.search.query.clone(), now);
                }
            }
            KeyCode::Delete => {
                if self.search.delete() {
                    self.debouncer.submit(self.search.query.clone(), now);
                }
            }
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.move_home(),
            KeyCode::End => self.search.move_end(),
            // Enter evaluates immediately, superseding the pending
            // debounced evaluation.
            KeyCode::Enter => {
                self.debouncer.cancel();
                let term = self.search.query.clone();
                self.run_search(&term, now);
            }
            // Esc clears the search and re-evaluates immediately.
            KeyCode::Esc => {
                self.debouncer.cancel();
                if self.search.clear() {
                    self.run_search("", now);
                } else {
                    self.focus = Focus::Table;
                }
            }
            KeyCode::Down => self.focus = Focus::Table,
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.filters.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.filters.select_next(),
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.filters.toggle_current();
                self.run_filters(now);
            }
            KeyCode::Char('c') => {
                if self.filters.clear() {
                    self.run_filters(now);
                }
            }
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent, now: Instant) {
        let total = self.rows.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.table.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.table.select_next(total),
            KeyCode::Home => self.table.select_first(),
            KeyCode::End => self.table.select_last(total),
            KeyCode::Enter => self.add_to_cart(now),
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Esc => self.should_quit = true,
            // Any other printable char focuses search and types it
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.focus = Focus::Search;
                self.search.insert(c);
                self.search.move_end();
                self.debouncer.submit(self.search.query.clone(), now);
            }
            _ => {}
        }
    }

    /// Simulated cart add: a transient banner, no network call
    fn add_to_cart(&mut self, now: Instant) {
        let Some(selected) = self.table.selected else {
            return;
        };
        let Some(&record_index) = self.rows.get(selected) else {
            return;
        };
        let record = &self.engine.records()[record_index];

        logging::info(
            "CART",
            &format!("added '{}' (id={})", record.name, record.id),
        );
        self.notification = Some(Notification {
            text: format!("{} adicionado ao carrinho!", record.name),
            expires: now + self.config.notification_lifetime,
        });
    }
}
