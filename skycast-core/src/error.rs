use thiserror::Error;

/// Errors surfaced by the query pipeline.
///
/// `Api` carries the message reported by the weather service verbatim (e.g.
/// "city not found"); transport and decode failures keep their source error
/// and are collapsed into a generic message at display time.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City name must not be empty")]
    EmptyCityName,

    #[error(
        "No API key configured.\n\
         Hint: run `skycast configure` and enter your OpenWeather API key."
    )]
    MissingApiKey,

    /// Error payload reported by the weather API itself.
    #[error("{message}")]
    Api { message: String },

    #[error("Failed to send request to OpenWeather: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse OpenWeather JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to parse forecast timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

impl WeatherError {
    /// Whether the error text is meant for the user as-is. Transport and
    /// decode failures are not; they render as a generic fetch failure.
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            WeatherError::EmptyCityName | WeatherError::MissingApiKey | WeatherError::Api { .. }
        )
    }
}
