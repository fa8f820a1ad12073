//! View state controller.
//!
//! [`Dashboard`] owns the selection, the catalogs and the series view state.
//! Network calls run on background threads and report back over a channel;
//! the dashboard applies them when polled, so all state mutation happens on
//! the owner's thread.
//!
//! Every series request is tagged with a generation number. Changing the
//! selection bumps the generation, and a response that arrives for an older
//! generation is discarded, so the displayed series always belongs to the
//! latest selection whatever order the responses arrive in.

use crate::api::Client;
use crate::catalog::{self, Indicator};
use crate::config::Settings;
use crate::error::FetchError;
use crate::models::{Country, DateRange, SeriesResult};
use log::{debug, warn};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Country selected before the user picks one ("World").
pub const DEFAULT_COUNTRY: &str = "WLD";

/// Where the dashboard gets its data from.
///
/// Implementations are called from background threads.
pub trait IndicatorSource: Send + Sync + 'static {
    fn load_countries(&self) -> Result<Vec<Country>, FetchError>;

    fn fetch_series(
        &self,
        country: &str,
        indicator: &str,
        range: DateRange,
    ) -> Result<SeriesResult, FetchError>;
}

impl IndicatorSource for Client {
    fn load_countries(&self) -> Result<Vec<Country>, FetchError> {
        Client::load_countries(self)
    }

    fn fetch_series(
        &self,
        country: &str,
        indicator: &str,
        range: DateRange,
    ) -> Result<SeriesResult, FetchError> {
        Client::fetch_series(self, country, indicator, range)
    }
}

/// State of the series area of the view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading,
    /// Fetch completed. "No data" is a `Loaded` result with `has_data() == false`.
    Loaded(SeriesResult),
    Error(String),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

/// What the user has picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub country: String,
    pub indicator: String,
    pub search: String,
}

#[derive(Debug)]
enum Message {
    Countries(Result<Vec<Country>, FetchError>),
    Series {
        generation: u64,
        result: Result<SeriesResult, FetchError>,
    },
}

pub struct Dashboard<S: IndicatorSource> {
    source: Arc<S>,
    range: DateRange,
    indicators: &'static [Indicator],
    countries: Vec<Country>,
    catalog_loading: bool,
    catalog_error: Option<String>,
    selection: Selection,
    state: ViewState,
    generation: u64,
    pending: usize,
    sender: Sender<Message>,
    receiver: Receiver<Message>,
}

impl Dashboard<Client> {
    /// Dashboard backed by the live API.
    pub fn with_settings(settings: Settings) -> Result<Self, FetchError> {
        let range = settings.date_range;
        Ok(Self::new(Client::new(settings)?, range))
    }
}

impl<S: IndicatorSource> Dashboard<S> {
    /// New dashboard in the `Loading` state with the default selection.
    /// Nothing is fetched until [`Dashboard::start`].
    pub fn new(source: S, range: DateRange) -> Self {
        let indicators = catalog::list_indicators();
        let (sender, receiver) = mpsc::channel();
        Self {
            source: Arc::new(source),
            range,
            indicators,
            countries: Vec::new(),
            catalog_loading: false,
            catalog_error: None,
            selection: Selection {
                country: DEFAULT_COUNTRY.to_string(),
                indicator: indicators
                    .first()
                    .map(|i| i.code.to_string())
                    .unwrap_or_default(),
                search: String::new(),
            },
            state: ViewState::Loading,
            generation: 0,
            pending: 0,
            sender,
            receiver,
        }
    }

    /// Load the country catalog and fetch the series for the initial selection.
    pub fn start(&mut self) {
        self.catalog_loading = true;
        self.catalog_error = None;
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        thread::spawn(move || {
            let _ = sender.send(Message::Countries(source.load_countries()));
        });
        self.request_series();
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn indicators(&self) -> &'static [Indicator] {
        self.indicators
    }

    /// Every loaded country, aggregates already excluded.
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn catalog_loading(&self) -> bool {
        self.catalog_loading
    }

    /// User-facing message when the country catalog failed to load.
    pub fn catalog_error(&self) -> Option<&str> {
        self.catalog_error.as_deref()
    }

    /// Series requests still in flight, stale ones included.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn current_country(&self) -> Option<&Country> {
        self.countries.iter().find(|c| c.id == self.selection.country)
    }

    pub fn current_indicator(&self) -> Option<&'static Indicator> {
        let code = self.selection.indicator.as_str();
        self.indicators.iter().find(|i| i.code == code)
    }

    /// Countries whose name contains the search text, case-insensitively.
    pub fn filtered_countries(&self) -> Vec<&Country> {
        let needle = self.selection.search.trim().to_lowercase();
        self.countries
            .iter()
            .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn select_country(&mut self, code: &str) {
        if self.selection.country != code {
            self.selection.country = code.to_string();
            self.request_series();
        }
    }

    pub fn select_indicator(&mut self, code: &str) {
        if self.selection.indicator != code {
            self.selection.indicator = code.to_string();
            self.request_series();
        }
    }

    /// Update the country search filter. Never triggers a fetch.
    pub fn set_search(&mut self, text: &str) {
        self.selection.search = text.to_string();
    }

    /// Re-issue the fetch for the current selection.
    pub fn retry(&mut self) {
        self.request_series();
    }

    fn request_series(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let Selection {
            country, indicator, ..
        } = self.selection.clone();

        if country.trim().is_empty() || indicator.trim().is_empty() {
            self.state = ViewState::Idle;
            return;
        }

        self.state = ViewState::Loading;
        self.pending += 1;
        debug!("requesting {country}/{indicator} (generation {generation})");

        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        let range = self.range;
        thread::spawn(move || {
            let result = source.fetch_series(&country, &indicator, range);
            let _ = sender.send(Message::Series { generation, result });
        });
    }

    /// Apply every completed fetch without blocking. Returns true if anything arrived.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.receiver.try_recv() {
            self.apply(msg);
            changed = true;
        }
        changed
    }

    /// Block until one fetch completes or `timeout` passes, then drain the rest.
    /// Returns true if anything arrived.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Ok(msg) => {
                self.apply(msg);
                self.poll();
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Wait until the catalog and every in-flight series fetch have reported,
    /// or the deadline passes. Returns true if everything settled.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.pending > 0 || self.catalog_loading {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            self.wait(deadline - now);
        }
        true
    }

    fn apply(&mut self, msg: Message) {
        match msg {
            Message::Countries(result) => {
                self.catalog_loading = false;
                match result {
                    Ok(countries) => {
                        debug!("catalog holds {} countries", countries.len());
                        self.countries = countries;
                    }
                    Err(e) => {
                        warn!("country catalog failed: {e}");
                        self.countries.clear();
                        self.catalog_error =
                            Some("Failed to fetch countries. Please try again later.".to_string());
                    }
                }
            }
            Message::Series { generation, result } => {
                self.pending = self.pending.saturating_sub(1);
                if generation != self.generation {
                    debug!(
                        "discarding stale response (generation {generation}, current {})",
                        self.generation
                    );
                    return;
                }
                self.state = match result {
                    Ok(series) => ViewState::Loaded(series),
                    Err(e) => {
                        warn!(
                            "fetch for {}/{} failed: {e}",
                            self.selection.country, self.selection.indicator
                        );
                        ViewState::Error(format!("Failed to fetch data: {e}"))
                    }
                };
            }
        }
    }
}
