use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::sync::Arc;

use skycast_core::{
    Config, FileStore, Location, NoLocation, OpenWeather, StaticLocation, SuggestionSearch,
    WeatherCache, WeatherService, WeatherState, forecast, location::LocationProvider, timeutil,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather and 5-day forecast in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key used for all requests.
    Configure,

    /// Show current conditions and the 5-day forecast for a city.
    Show {
        /// City name, e.g. "London" or "San Francisco".
        city: String,
    },

    /// Show weather for explicit coordinates.
    Here {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
    },

    /// Show the most recently fetched weather, if it is still fresh.
    Last,

    /// Look up city suggestions for a partial name.
    Search {
        /// At least two characters of a city name.
        query: String,
    },

    /// Manage the favorite-cities list.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    List,
    Add { city: String },
    Remove { city: String },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => {
                let service = build_service()?;
                service.fetch_by_city(&city).await;
                print_state(&service.state())
            }
            Command::Here { lat, lon } => {
                let service = build_service()?;
                service.fetch_by_location(Location { latitude: lat, longitude: lon }).await;
                print_state(&service.state())
            }
            Command::Last => {
                let service = build_service()?;
                if !service.load_from_cache().await {
                    bail!(
                        "No fresh cached weather. Run `skycast show <city>` to fetch a forecast."
                    );
                }
                print_state(&service.state())
            }
            Command::Search { query } => search(&query).await,
            Command::Favorites { action } => favorites(action).await,
        }
    }
}

fn build_service() -> Result<WeatherService> {
    let config = Config::load()?;
    let provider = OpenWeather::new(config.api_key()?.to_string())?;

    let locator: Box<dyn LocationProvider> = match config.home_location() {
        Some(home) => Box::new(StaticLocation(home)),
        None => Box::new(NoLocation),
    };

    let store = FileStore::new(FileStore::default_dir()?);

    Ok(WeatherService::new(Box::new(provider), locator, Box::new(store)))
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn print_state(state: &WeatherState) -> Result<()> {
    if let Some(error) = &state.error {
        bail!("{error}");
    }
    let Some(current) = &state.current else {
        bail!("No weather data available.");
    };

    println!("{} — {}", state.city_name, current.condition_name());
    println!(
        "  {:.1}°C (feels like {:.1}°C), humidity {}%, wind {:.1} m/s",
        current.main.temp, current.main.feels_like, current.main.humidity, current.wind.speed
    );

    let days = forecast::group_by_day(&state.samples);
    if !days.is_empty() {
        println!();
        for day in &days {
            println!(
                "  {:<9} {:>4}° / {:>4}°  {}",
                day.day_name, day.high, day.low, day.condition
            );
        }
    }

    let hours = forecast::hourly_today(&state.samples);
    if !hours.is_empty() {
        println!();
        println!("Today:");
        for hour in &hours {
            println!("  {}  {:>4}°  {}", hour.time, hour.temp, hour.condition);
        }
    }

    if let Some(updated_ms) = state.last_updated_ms {
        println!();
        println!("Updated at {}", timeutil::time_of_day(updated_ms / 1000));
    }

    Ok(())
}

async fn search(query: &str) -> Result<()> {
    let config = Config::load()?;
    let provider = OpenWeather::new(config.api_key()?.to_string())?;
    let search = SuggestionSearch::new(Arc::new(provider));

    let Some(suggestions) = search.query(query).await else {
        return Ok(());
    };
    if suggestions.is_empty() {
        println!("No matches for '{query}'.");
        return Ok(());
    }

    for suggestion in &suggestions {
        println!("{}  ({:.2}, {:.2})", suggestion.label(), suggestion.lat, suggestion.lon);
    }
    Ok(())
}

async fn favorites(action: FavoritesAction) -> Result<()> {
    let cache = WeatherCache::new(Box::new(FileStore::new(FileStore::default_dir()?)));

    match action {
        FavoritesAction::List => {
            let favorites = cache.favorites().await;
            if favorites.is_empty() {
                println!("No favorite cities yet.");
            }
            for city in favorites {
                println!("{city}");
            }
        }
        FavoritesAction::Add { city } => {
            cache.add_favorite(&city).await;
            println!("Added '{city}' to favorites.");
        }
        FavoritesAction::Remove { city } => {
            cache.remove_favorite(&city).await;
            println!("Removed '{city}' from favorites.");
        }
    }

    Ok(())
}
