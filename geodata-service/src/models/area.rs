use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `?city=` selector shared by the layer endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct CityQuery {
    pub city: Option<String>,
}

impl CityQuery {
    /// Lowercased city, or `default` when absent or blank.
    pub fn city_or(&self, default: &str) -> String {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(default)
            .to_lowercase()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AreaQuery {
    pub city: Option<String>,
    pub id: Option<String>,
}

impl AreaQuery {
    pub fn city(&self) -> CityQuery {
        CityQuery {
            city: self.city.clone(),
        }
    }
}

/// One entry of the area picker list.
///
/// Values are passed through as stored in the layer, so an id may be a
/// number or a string depending on the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaSummary {
    pub id: Value,
    pub name: Value,
}
