use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::WeatherError,
    model::{Coordinates, CurrentConditions, ForecastEntry, UnitSystem},
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Timestamp format of the forecast `dt_txt` field.
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different host, e.g. a local mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    async fn get_body(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<String, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, "sending OpenWeather request");

        let res = self.http.get(&url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn resolve_city(
        &self,
        city: &str,
        units: UnitSystem,
    ) -> Result<CurrentConditions, WeatherError> {
        let body = self
            .get_body(
                "weather",
                &[
                    ("q", city.to_string()),
                    ("appid", self.api_key.clone()),
                    ("units", units.as_str().to_string()),
                ],
            )
            .await?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;

        Ok(map_current(parsed))
    }

    async fn fetch_forecast(
        &self,
        coord: Coordinates,
        units: UnitSystem,
    ) -> Result<Vec<ForecastEntry>, WeatherError> {
        let body = self
            .get_body(
                "forecast",
                &[
                    ("lat", coord.lat.to_string()),
                    ("lon", coord.lon.to_string()),
                    ("appid", self.api_key.clone()),
                    ("units", units.as_str().to_string()),
                ],
            )
            .await?;

        let parsed: OwForecastResponse = serde_json::from_str(&body)?;

        map_forecast(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_max: f64,
    temp_min: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp_max: f64,
    temp_min: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

/// Error payloads look like `{"cod":"404","message":"city not found"}`.
#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

fn api_error(status: StatusCode, body: &str) -> WeatherError {
    match serde_json::from_str::<OwErrorBody>(body) {
        Ok(err) => WeatherError::Api { message: err.message },
        Err(_) => WeatherError::Api {
            message: format!(
                "OpenWeather request failed with status {status}: {}",
                truncate_body(body),
            ),
        },
    }
}

fn primary_weather(weather: &[OwWeather]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.description.clone(), w.icon.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

fn map_current(parsed: OwCurrentResponse) -> CurrentConditions {
    let (description, icon) = primary_weather(&parsed.weather);

    CurrentConditions {
        city: parsed.name,
        coord: Coordinates { lat: parsed.coord.lat, lon: parsed.coord.lon },
        temperature: parsed.main.temp,
        feels_like: parsed.main.feels_like,
        temp_max: parsed.main.temp_max,
        temp_min: parsed.main.temp_min,
        humidity: parsed.main.humidity,
        wind_speed: parsed.wind.speed,
        pressure: parsed.main.pressure,
        description,
        icon,
    }
}

fn map_forecast(parsed: OwForecastResponse) -> Result<Vec<ForecastEntry>, WeatherError> {
    parsed
        .list
        .into_iter()
        .map(|entry| {
            let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT)?;
            let (description, icon) = primary_weather(&entry.weather);

            Ok(ForecastEntry {
                timestamp,
                temp_max: entry.main.temp_max,
                temp_min: entry.main.temp_min,
                description,
                icon,
            })
        })
        .collect()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_JSON: &str = r#"{
        "coord": {"lon": 67.0822, "lat": 24.9056},
        "weather": [{"id": 721, "main": "Haze", "description": "haze", "icon": "50d"}],
        "main": {
            "temp": 31.9,
            "feels_like": 38.9,
            "temp_min": 31.9,
            "temp_max": 31.9,
            "pressure": 1002,
            "humidity": 66
        },
        "wind": {"speed": 4.63, "deg": 250},
        "name": "Karachi"
    }"#;

    #[test]
    fn maps_current_response_into_conditions() {
        let parsed: OwCurrentResponse = serde_json::from_str(CURRENT_JSON).expect("valid fixture");
        let current = map_current(parsed);

        assert_eq!(current.city, "Karachi");
        assert!((current.coord.lat - 24.9056).abs() < f64::EPSILON);
        assert!((current.coord.lon - 67.0822).abs() < f64::EPSILON);
        assert!((current.temperature - 31.9).abs() < f64::EPSILON);
        assert!((current.feels_like - 38.9).abs() < f64::EPSILON);
        assert_eq!(current.humidity, 66);
        assert_eq!(current.pressure, 1002);
        assert_eq!(current.description, "haze");
        assert_eq!(current.icon, "50d");
    }

    #[test]
    fn missing_weather_block_falls_back_to_unknown() {
        let json = r#"{
            "coord": {"lon": 0.0, "lat": 0.0},
            "weather": [],
            "main": {
                "temp": 10.0, "feels_like": 9.0, "temp_min": 8.0,
                "temp_max": 12.0, "pressure": 1013, "humidity": 50
            },
            "wind": {"speed": 1.0},
            "name": "Null Island"
        }"#;
        let parsed: OwCurrentResponse = serde_json::from_str(json).expect("valid fixture");
        let current = map_current(parsed);

        assert_eq!(current.description, "Unknown");
        assert!(current.icon.is_empty());
    }

    #[test]
    fn maps_forecast_entries_in_list_order() {
        let json = r#"{
            "list": [
                {
                    "dt_txt": "2025-03-01 09:00:00",
                    "main": {"temp_max": 30.2, "temp_min": 27.8},
                    "weather": [{"description": "few clouds", "icon": "02d"}]
                },
                {
                    "dt_txt": "2025-03-01 12:00:00",
                    "main": {"temp_max": 31.0, "temp_min": 29.1},
                    "weather": [{"description": "scattered clouds", "icon": "03d"}]
                }
            ]
        }"#;
        let parsed: OwForecastResponse = serde_json::from_str(json).expect("valid fixture");
        let entries = map_forecast(parsed).expect("timestamps parse");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].timestamp.to_string(), "2025-03-01 09:00:00");
        assert_eq!(entries[1].description, "scattered clouds");
        assert!((entries[0].temp_max - 30.2).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_dt_txt_is_a_timestamp_error() {
        let json = r#"{
            "list": [
                {
                    "dt_txt": "not a timestamp",
                    "main": {"temp_max": 1.0, "temp_min": 0.0},
                    "weather": []
                }
            ]
        }"#;
        let parsed: OwForecastResponse = serde_json::from_str(json).expect("valid fixture");
        let err = map_forecast(parsed).unwrap_err();

        assert!(matches!(err, WeatherError::Timestamp(_)));
    }

    #[test]
    fn api_error_extracts_reported_message() {
        let err = api_error(
            StatusCode::NOT_FOUND,
            r#"{"cod":"404","message":"city not found"}"#,
        );
        assert_eq!(err.to_string(), "city not found");
    }

    #[test]
    fn api_error_falls_back_to_status_and_body() {
        let err = api_error(StatusCode::BAD_GATEWAY, "upstream exploded");
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("upstream exploded"));
    }

    #[test]
    fn truncate_body_caps_long_payloads() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));

        assert_eq!(truncate_body("short"), "short");
    }
}
