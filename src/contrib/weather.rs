use crate::client::{Yql, YqlResponse};
use crate::config::ClientConfig;
use crate::errors::AppResult;
use crate::models::TemperatureUnit;
use crate::query::{Condition, Select};

const FORECAST_TABLE: &str = "weather.forecast";

/// Queries the `weather.forecast` table by place name.
#[derive(Debug)]
pub struct Weather {
    yql: Yql,
    unit: TemperatureUnit,
}

impl Weather {
    pub fn new(config: ClientConfig, unit: TemperatureUnit) -> AppResult<Self> {
        Ok(Self {
            yql: Yql::new(config)?,
            unit,
        })
    }

    pub fn from_client(yql: Yql, unit: TemperatureUnit) -> Self {
        Self { yql, unit }
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Builds the forecast select for `place`, falling back to the default unit.
    pub fn forecast_query(
        &self,
        place: &str,
        unit: Option<TemperatureUnit>,
        items: &[&str],
    ) -> Select {
        let unit = unit.unwrap_or(self.unit);
        Select::new(FORECAST_TABLE)
            .items(items.iter().copied())
            .filter(Condition::in_subquery("woeid", woeid_subquery(place)))
            .filter(Condition::equals("u", unit.as_str()))
    }

    pub async fn get_weather_in(
        &self,
        place: &str,
        unit: Option<TemperatureUnit>,
        items: &[&str],
    ) -> AppResult<YqlResponse> {
        self.yql
            .execute(self.forecast_query(place, unit, items))
            .await
    }

    pub async fn get_weather_forecast(&self, place: &str) -> AppResult<YqlResponse> {
        self.get_weather_in(place, None, &["item.forecast"]).await
    }

    pub async fn get_weather_description(&self, place: &str) -> AppResult<YqlResponse> {
        self.get_weather_in(place, None, &["item.description"]).await
    }

    pub async fn get_current_condition(&self, place: &str) -> AppResult<YqlResponse> {
        self.get_weather_in(place, None, &["item.condition"]).await
    }

    /// Humidity, visibility, pressure and rising.
    pub async fn get_current_atmosphere(&self, place: &str) -> AppResult<YqlResponse> {
        self.get_weather_in(place, None, &["atmosphere"]).await
    }

    /// Chill, direction and speed.
    pub async fn get_current_wind(&self, place: &str) -> AppResult<YqlResponse> {
        self.get_weather_in(place, None, &["wind"]).await
    }

    /// Sunrise and sunset.
    pub async fn get_astronomy(&self, place: &str) -> AppResult<YqlResponse> {
        self.get_weather_in(place, None, &["astronomy"]).await
    }
}

fn woeid_subquery(place: &str) -> String {
    format!(
        "SELECT woeid FROM geo.places WHERE text=\"{}\"",
        place.replace('\\', "\\\\").replace('"', "\\\"")
    )
}
