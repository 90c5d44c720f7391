use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, CurrentConditions, ForecastEntry, UnitSystem},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The two remote lookups the query pipeline depends on.
///
/// `fetch_forecast` takes the coordinates returned by `resolve_city`; callers
/// must not invoke it unless resolution succeeded.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Look up current conditions for a city name.
    async fn resolve_city(
        &self,
        city: &str,
        units: UnitSystem,
    ) -> Result<CurrentConditions, WeatherError>;

    /// Fetch the 5-day/3-hour forecast for resolved coordinates.
    async fn fetch_forecast(
        &self,
        coord: Coordinates,
        units: UnitSystem,
    ) -> Result<Vec<ForecastEntry>, WeatherError>;
}

/// Construct the OpenWeather-backed provider from config.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    let api_key = config.api_key().ok_or(WeatherError::MissingApiKey)?;
    Ok(Box::new(OpenWeatherClient::new(api_key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(matches!(err, WeatherError::MissingApiKey));
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_key_is_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
