//! Plain-text rendering of the controller's view: an error line when one is
//! set, otherwise current conditions followed by the extended forecast.

use skycast_core::{
    CurrentConditions, ForecastEntry, UnitSystem, WeatherController, extended_forecast,
};

pub fn view(controller: &WeatherController) -> String {
    if let Some(error) = &controller.view_state().error {
        return format!("{error}\n");
    }

    match controller.snapshot() {
        Some(snapshot) => {
            let mut out = current_conditions(&snapshot.current, controller.units());
            out.push('\n');
            out.push_str(&forecast_lines(&snapshot.forecast, controller.units()));
            out
        }
        None => "No Weather Data Found\n".to_string(),
    }
}

fn current_conditions(current: &CurrentConditions, units: UnitSystem) -> String {
    let deg = units.temp_label();
    let mut out = String::new();

    out.push_str(&format!("Current weather in {}\n", current.city));
    out.push_str(&format!(
        "  {}  {:.1}{deg} (feels like {:.1}{deg})\n",
        current.description, current.temperature, current.feels_like
    ));
    out.push_str(&format!(
        "  High {:.1}{deg} / Low {:.1}{deg}\n",
        current.temp_max, current.temp_min
    ));
    out.push_str(&format!("  Humidity {}%\n", current.humidity));
    out.push_str(&format!(
        "  Wind {:.1} {}\n",
        current.wind_speed,
        units.speed_label()
    ));
    out.push_str(&format!("  Pressure {} hPa\n", current.pressure));
    out.push_str(&format!("  Icon {}\n", current.icon_url()));

    out
}

fn forecast_lines(entries: &[ForecastEntry], units: UnitSystem) -> String {
    let filtered = extended_forecast(entries);
    if filtered.is_empty() {
        return "No Forecast Data Found\n".to_string();
    }

    let deg = units.temp_label();
    let mut out = String::from("Extended forecast\n");

    for entry in &filtered {
        out.push_str(&format!(
            "  {}  {:.1}{deg} / {:.1}{deg}  {}  {}\n",
            entry.timestamp.format("%a"),
            entry.temp_max,
            entry.temp_min,
            entry.description,
            entry.icon_url(),
        ));
    }

    out
}
