use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Select, Text};
use skycast_core::{Config, UnitSystem, WeatherController, provider_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "City weather and 5-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred unit system.
    Configure,

    /// Show current conditions and the extended forecast for a city.
    Show {
        /// City name, e.g. "karachi".
        city: String,

        /// Unit system, "metric" or "imperial"; defaults to the configured one.
        #[arg(long)]
        units: Option<String>,
    },

    /// Search cities and toggle units in a prompt loop.
    Interactive {
        /// Unit system to start with; defaults to the configured one.
        #[arg(long)]
        units: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, units } => show(&city, units.as_deref()).await,
            Command::Interactive { units } => interactive(units.as_deref()).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let units = Select::new(
        "Preferred unit system:",
        UnitSystem::all().to_vec(),
    )
    .prompt()
    .context("Failed to read unit selection")?;

    config.set_api_key(api_key);
    config.set_units(units);
    config.save()?;

    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}

fn resolve_units(flag: Option<&str>, config: &Config) -> anyhow::Result<UnitSystem> {
    match flag {
        Some(value) => UnitSystem::try_from(value),
        None => Ok(config.units_or_default()),
    }
}

async fn show(city: &str, units: Option<&str>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let units = resolve_units(units, &config)?;
    let provider = provider_from_config(&config)?;

    let mut controller = WeatherController::new(provider, units);
    controller.submit_query(city).await;

    if let Some(error) = &controller.view_state().error {
        anyhow::bail!("{error}");
    }

    print!("{}", render::view(&controller));

    Ok(())
}

const SEARCH_AGAIN: &str = "Search another city";
const QUIT: &str = "Quit";

async fn interactive(units: Option<&str>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let units = resolve_units(units, &config)?;
    let provider = provider_from_config(&config)?;

    let mut controller = WeatherController::new(provider, units);

    let city = Text::new("City name:")
        .prompt()
        .context("Failed to read city name")?;
    controller.submit_query(&city).await;
    print!("{}", render::view(&controller));

    loop {
        let toggle = format!("Switch to {}", controller.units().toggled());
        let options = vec![SEARCH_AGAIN.to_string(), toggle.clone(), QUIT.to_string()];

        let choice = Select::new("Next:", options)
            .prompt()
            .context("Failed to read selection")?;

        if choice == SEARCH_AGAIN {
            let city = Text::new("City name:")
                .prompt()
                .context("Failed to read city name")?;
            controller.submit_query(&city).await;
        } else if choice == toggle {
            controller.toggle_units().await;
        } else {
            return Ok(());
        }

        print!("{}", render::view(&controller));
    }
}
