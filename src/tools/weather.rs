use super::Tool;
use crate::{config::Settings, schemas::parameters_schema_for, schemas::validator};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Number, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// OpenWeatherMap current-conditions endpoint
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Parameters for weather queries
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WeatherParams {
    /// The name of the city (e.g. "Melbourne", "New York", "London")
    pub city: String,
}

/// Failure kinds of a weather lookup, checked in declaration order.
///
/// The `Display` form is what the agent sees as the tool result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// Connection, DNS, timeout or non-2xx status
    #[error("Error fetching weather data: {0}")]
    Transport(String),
    /// Valid JSON that lacks an expected field
    #[error("Error parsing weather data: {0}")]
    Shape(String),
    #[error("Unexpected error: {0}")]
    Other(String),
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: MainReadings,
    weather: Vec<Condition>,
    wind: Wind,
    name: String,
    sys: SysInfo,
}

// Numbers stay as `Number` so they print exactly as the provider sent them.
#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: Number,
    feels_like: Number,
    humidity: Number,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: Number,
}

#[derive(Debug, Deserialize)]
struct SysInfo {
    country: String,
}

/// Current-weather lookup backed by OpenWeatherMap.
///
/// [`WeatherTool::get_weather`] is string-in/string-out: every failure is
/// folded into a descriptive message instead of an error, so the model can
/// explain it to the user.
#[derive(Debug, Clone)]
pub struct WeatherTool {
    api_key: String,
    endpoint: String,
    client: Client,
}

impl WeatherTool {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_WEATHER_URL.to_string(),
            client: Client::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let tool = Self::new(settings.openweather_api_key.clone());
        match &settings.openweather_url {
            Some(url) => tool.with_endpoint(url.clone()),
            None => tool,
        }
    }

    /// Point the tool at a different current-weather endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Look up the current weather for `city` and render it as a report.
    pub async fn get_weather(&self, city: &str) -> String {
        match self.fetch_report(city).await {
            Ok(report) => report,
            Err(err) => {
                warn!(city, error = %err, "weather lookup failed");
                err.to_string()
            }
        }
    }

    /// Same as [`get_weather`](Self::get_weather) but keeps the failure kind.
    pub async fn fetch_report(&self, city: &str) -> Result<String, WeatherError> {
        if city.trim().is_empty() {
            return Err(WeatherError::Other("city must not be empty".to_string()));
        }

        debug!(city, endpoint = %self.endpoint, "requesting current weather");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(WeatherError::Transport(describe_status(status, &body)));
        }

        let value: Value = serde_json::from_str(&body).map_err(|err| {
            WeatherError::Other(format!("weather response is not valid JSON: {}", err))
        })?;

        let current: CurrentWeather =
            serde_path_to_error::deserialize(value).map_err(classify_decode_error)?;

        format_report(&current)
    }
}

// Only absent keys count as a shape problem; a present value of the wrong
// type (including `null`) is unexpected.
fn classify_decode_error(err: serde_path_to_error::Error<serde_json::Error>) -> WeatherError {
    let path = err.path().to_string();
    let detail = if path == "." {
        err.inner().to_string()
    } else {
        format!("{}: {}", path, err.inner())
    };

    if err.inner().to_string().starts_with("missing field") {
        WeatherError::Shape(detail)
    } else {
        WeatherError::Other(detail)
    }
}

// The request URL carries `appid`, so it is stripped before the message
// reaches the model.
fn transport_error(err: reqwest::Error) -> WeatherError {
    WeatherError::Transport(err.without_url().to_string())
}

fn describe_status(status: StatusCode, body: &str) -> String {
    let provider_message = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .get("message")
            .and_then(|message| message.as_str())
            .map(str::to_string)
    });

    match provider_message {
        Some(message) if !message.is_empty() => format!("HTTP {}: {}", status, message),
        _ => format!("HTTP {}", status),
    }
}

fn format_report(current: &CurrentWeather) -> Result<String, WeatherError> {
    let condition = current.weather.first().ok_or_else(|| {
        WeatherError::Other("weather conditions list is empty".to_string())
    })?;

    let lines = [
        format!("Current weather in {}, {}:", current.name, current.sys.country),
        format!("🌡️ Temperature: {}°C", current.main.temp),
        format!("🌡️ Feels like: {}°C", current.main.feels_like),
        format!("💧 Humidity: {}%", current.main.humidity),
        format!("🌤️ Conditions: {}", capitalize(&condition.description)),
        format!("💨 Wind Speed: {} m/s", current.wind.speed),
    ];

    Ok(lines.join("\n"))
}

/// Uppercase the first character and lowercase the rest
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &'static str {
        "get_weather"
    }

    fn description(&self) -> &'static str {
        "Get current weather information for a specific city. Returns temperature, feels-like temperature, humidity, conditions and wind speed."
    }

    fn parameters_schema(&self) -> Value {
        parameters_schema_for::<WeatherParams>()
    }

    async fn execute(&self, parameters: Value) -> crate::Result<Value> {
        let params: WeatherParams = validator::serde_first_validate(parameters)?;
        Ok(Value::String(self.get_weather(&params.city).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "main": {"temp": 18.2, "feels_like": 17.5, "humidity": 60},
            "weather": [{"description": "clear sky"}],
            "wind": {"speed": 3.1},
            "name": "Melbourne",
            "sys": {"country": "AU"}
        })
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("clear sky"), "Clear sky");
        assert_eq!(capitalize("LIGHT RAIN"), "Light rain");
        assert_eq!(capitalize("é"), "É");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_format_report() {
        let current: CurrentWeather = serde_json::from_value(sample_payload()).unwrap();
        let report = format_report(&current).unwrap();

        assert_eq!(
            report,
            "Current weather in Melbourne, AU:\n\
             🌡️ Temperature: 18.2°C\n\
             🌡️ Feels like: 17.5°C\n\
             💧 Humidity: 60%\n\
             🌤️ Conditions: Clear sky\n\
             💨 Wind Speed: 3.1 m/s"
        );
    }

    #[test]
    fn test_empty_conditions_list() {
        let mut payload = sample_payload();
        payload["weather"] = json!([]);
        let current: CurrentWeather = serde_json::from_value(payload).unwrap();

        let err = format_report(&current).unwrap_err();
        assert!(matches!(err, WeatherError::Other(_)));
    }

    #[test]
    fn test_error_labels() {
        assert!(WeatherError::Transport("x".into())
            .to_string()
            .starts_with("Error fetching weather data:"));
        assert!(WeatherError::Shape("x".into())
            .to_string()
            .starts_with("Error parsing weather data:"));
        assert!(WeatherError::Other("x".into())
            .to_string()
            .starts_with("Unexpected error:"));
    }

    #[test]
    fn test_describe_status_uses_provider_message() {
        let detail = describe_status(
            StatusCode::NOT_FOUND,
            r#"{"cod":"404","message":"city not found"}"#,
        );
        assert_eq!(detail, "HTTP 404 Not Found: city not found");

        let detail = describe_status(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(detail, "HTTP 502 Bad Gateway");
    }

    #[test]
    fn test_schema_requires_city() {
        let schema = WeatherTool::new("key").parameters_schema();
        assert_eq!(schema["properties"]["city"]["type"], "string");
        assert_eq!(schema["required"], json!(["city"]));
    }

    #[tokio::test]
    async fn test_empty_city_rejected_without_request() {
        let tool = WeatherTool::new("key").with_endpoint("http://127.0.0.1:1/unused");
        let result = tool.get_weather("   ").await;
        assert_eq!(result, "Unexpected error: city must not be empty");
    }
}
