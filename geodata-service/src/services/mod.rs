pub mod air_quality;
pub mod layers;
pub mod metrics;
pub mod providers;

pub use air_quality::{AirQualityClient, AirQualityError, DailyQuery};
pub use layers::{AreaLookup, Layer, LayerStore};
