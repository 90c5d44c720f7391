use crate::{
    error::WeatherError,
    model::{ForecastEntry, UnitSystem, WeatherSnapshot},
    provider::WeatherProvider,
};

/// Generic message shown when a lookup fails for reasons the weather service
/// did not report itself (transport errors, undecodable payloads).
pub const GENERIC_FETCH_ERROR: &str = "Failed to fetch weather data";

/// What the view renders besides the data itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// True from query submission until both lookups settle.
    pub loading: bool,
    pub error: Option<String>,
}

/// Drives the two-step query pipeline and owns all view state.
///
/// The pipeline is strictly sequential: the forecast lookup only runs with
/// coordinates from a successful city resolution, enforced by the `Result`
/// chain in [`WeatherController::fetch`]. Pipeline runs are serialized by the
/// `&mut self` receiver; there is no cancellation or generation guard for
/// overlapping requests because overlap cannot occur.
pub struct WeatherController {
    provider: Box<dyn WeatherProvider>,
    units: UnitSystem,
    city: Option<String>,
    state: ViewState,
    snapshot: Option<WeatherSnapshot>,
}

impl WeatherController {
    pub fn new(provider: Box<dyn WeatherProvider>, units: UnitSystem) -> Self {
        Self {
            provider,
            units,
            city: None,
            state: ViewState::default(),
            snapshot: None,
        }
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.state
    }

    /// Last successful snapshot. Retained across a failed re-query, though
    /// the view renders the error instead while one is set.
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    /// Validate and submit a city query. Blank input is rejected before any
    /// network call is made.
    pub async fn submit_query(&mut self, city: &str) {
        let trimmed = city.trim();
        if trimmed.is_empty() {
            self.state.error = Some(WeatherError::EmptyCityName.to_string());
            return;
        }

        self.city = Some(trimmed.to_string());
        self.run_pipeline().await;
    }

    /// Flip metric/imperial and re-run the pipeline for the current city, if
    /// one has been submitted.
    pub async fn toggle_units(&mut self) {
        self.units = self.units.toggled();

        if self.city.is_some() {
            self.run_pipeline().await;
        }
    }

    async fn run_pipeline(&mut self) {
        let Some(city) = self.city.clone() else {
            return;
        };

        self.state = ViewState { loading: true, error: None };

        match self.fetch(&city).await {
            Ok(snapshot) => self.snapshot = Some(snapshot),
            Err(err) => self.state.error = Some(display_error(&err)),
        }

        // Loading clears once, after both lookups have settled.
        self.state.loading = false;
    }

    /// The two dependent lookups. Resolution failure short-circuits, so the
    /// forecast lookup is unreachable without coordinates.
    async fn fetch(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let current = self.provider.resolve_city(city, self.units).await?;
        let forecast = self
            .provider
            .fetch_forecast(current.coord, self.units)
            .await?;

        Ok(WeatherSnapshot { current, forecast })
    }
}

/// Reduce a pipeline error to the single string the view displays.
pub fn display_error(err: &WeatherError) -> String {
    if err.is_reported() {
        err.to_string()
    } else {
        GENERIC_FETCH_ERROR.to_string()
    }
}

/// Select one entry per day: keep the entries sharing the time-of-day of the
/// first entry in the sequence. Entries are assumed already sorted ascending
/// by timestamp, as the forecast endpoint returns them.
pub fn extended_forecast(entries: &[ForecastEntry]) -> Vec<ForecastEntry> {
    let Some(first) = entries.first() else {
        return Vec::new();
    };

    let slot = first.timestamp.time();
    entries
        .iter()
        .filter(|entry| entry.timestamp.time() == slot)
        .cloned()
        .collect()
}
