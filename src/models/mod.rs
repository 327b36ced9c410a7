pub mod consolidated;
pub mod daily;
pub mod measurement;
pub mod observation;
pub mod pollutant;
pub mod station;

pub use consolidated::{ConsolidatedRecord, ConsolidatedRecordBuilder, PollutantReading};
pub use daily::DailyAqiRecord;
pub use measurement::Measurement;
pub use observation::{CombinedObservation, Pm25Reading, QcStatus, StationSeries};
pub use pollutant::{Pollutant, PollutantValues};
pub use station::{StationId, StationRegistry};
