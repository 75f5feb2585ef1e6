use serde::{Deserialize, Serialize};

/// Geographic coordinates, either device-supplied or echoed back by the
/// provider when a lookup was made by city name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Coordinate pair as the provider spells it on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coord> for Location {
    fn from(coord: Coord) -> Self {
        Self { latitude: coord.lat, longitude: coord.lon }
    }
}

/// One `weather[]` entry: numeric condition code, condition group
/// ("Clear", "Rain", ...), free-text description, and icon code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// The `main` measurement block shared by current weather and forecast entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub temp: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub humidity: u8,
    #[serde(default)]
    pub pressure: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
}

/// Current conditions for one location, as returned by `/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub coord: Coord,
    pub weather: Vec<Condition>,
    pub main: Measurements,
    pub wind: Wind,
    pub name: String,
    pub dt: i64,
}

impl CurrentWeather {
    pub fn condition_name(&self) -> &str {
        self.weather.first().map(|w| w.main.as_str()).unwrap_or("Unknown")
    }

    pub fn icon_code(&self) -> &str {
        self.weather.first().map(|w| w.icon.as_str()).unwrap_or("01d")
    }
}

/// One raw 3-hourly forecast data point from the `/forecast` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub dt: i64,
    pub main: Measurements,
    pub weather: Vec<Condition>,
}

impl ForecastSample {
    pub fn temperature(&self) -> f64 {
        self.main.temp
    }

    pub fn condition_name(&self) -> &str {
        self.weather.first().map(|w| w.main.as_str()).unwrap_or("Unknown")
    }

    pub fn icon_code(&self) -> &str {
        self.weather.first().map(|w| w.icon.as_str()).unwrap_or("01d")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    #[serde(default)]
    pub country: String,
}

/// Forecast response: a chronological sample list plus the resolved city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastSample>,
    pub city: City,
}

/// One geocoding hit for search-as-you-type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl CitySuggestion {
    /// Display label, e.g. "Portland, Oregon, US" or "Berlin, DE".
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}, {}", self.name, state, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord_converts_to_location() {
        let loc = Location::from(Coord { lat: 51.5, lon: -0.12 });
        assert_eq!(loc.latitude, 51.5);
        assert_eq!(loc.longitude, -0.12);
    }

    #[test]
    fn sample_accessors_fall_back_when_weather_is_empty() {
        let sample = ForecastSample {
            dt: 0,
            main: Measurements { temp: 1.0, feels_like: 1.0, humidity: 0, pressure: 0.0 },
            weather: Vec::new(),
        };
        assert_eq!(sample.condition_name(), "Unknown");
        assert_eq!(sample.icon_code(), "01d");
    }

    #[test]
    fn suggestion_label_includes_state_when_present() {
        let with_state = CitySuggestion {
            name: "Portland".into(),
            country: "US".into(),
            state: Some("Oregon".into()),
            lat: 45.5,
            lon: -122.7,
        };
        assert_eq!(with_state.label(), "Portland, Oregon, US");

        let without_state = CitySuggestion {
            name: "Berlin".into(),
            country: "DE".into(),
            state: None,
            lat: 52.5,
            lon: 13.4,
        };
        assert_eq!(without_state.label(), "Berlin, DE");
    }

    #[test]
    fn current_weather_round_trips_through_json() {
        let json = r#"{
            "coord": {"lat": 51.51, "lon": -0.13},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 18.3, "feels_like": 17.9, "humidity": 60, "pressure": 1014},
            "wind": {"speed": 3.4, "deg": 220},
            "name": "London",
            "dt": 1700000000
        }"#;
        let parsed: CurrentWeather = serde_json::from_str(json).expect("valid payload");
        assert_eq!(parsed.name, "London");
        assert_eq!(parsed.condition_name(), "Clear");

        let raw = serde_json::to_string(&parsed).expect("serializable");
        let again: CurrentWeather = serde_json::from_str(&raw).expect("round trip");
        assert_eq!(again, parsed);
    }
}
