//! Rain (humidity) sensor: threshold plus debounced notification

use contracts::{DocumentStore, Notifier};

use crate::alert::DebouncedAlert;
use crate::profile::{SensorProfile, Threshold};
use crate::service::IngestionService;

pub const NAME: &str = "rain";
pub const VALUE_FIELD: &str = "humidityLevel";
pub const DEFAULT_PORT: u16 = 6969;
/// Humidity fraction above which it counts as raining
pub const DEFAULT_THRESHOLD: f64 = 0.5;
pub const ALERT_MESSAGE: &str = "Hey there! My sensors are telling me that it's raining outside. I suggest you take a look at the windows!";

pub fn profile() -> SensorProfile {
    SensorProfile::new(NAME, VALUE_FIELD, Threshold::Above(DEFAULT_THRESHOLD))
}

pub fn service<S: DocumentStore + Sync, N: Notifier + Send + Sync>(
    profile: SensorProfile,
    store: S,
    notifier: N,
) -> IngestionService<S, DebouncedAlert<N>> {
    IngestionService::new(profile, store, DebouncedAlert::new(notifier, ALERT_MESSAGE))
}
