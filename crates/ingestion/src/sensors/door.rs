//! Door distance sensor: threshold only, no alerting

use contracts::DocumentStore;

use crate::alert::NoAlert;
use crate::profile::{SensorProfile, Threshold};
use crate::service::IngestionService;

pub const NAME: &str = "door";
pub const VALUE_FIELD: &str = "distance";
pub const DEFAULT_PORT: u16 = 6970;
/// Distance above which the door counts as open
pub const DEFAULT_THRESHOLD: f64 = 10.0;

pub fn profile() -> SensorProfile {
    SensorProfile::new(NAME, VALUE_FIELD, Threshold::Above(DEFAULT_THRESHOLD))
}

pub fn service<S: DocumentStore + Sync>(profile: SensorProfile, store: S) -> IngestionService<S, NoAlert> {
    IngestionService::new(profile, store, NoAlert)
}
