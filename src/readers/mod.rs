pub mod combined_reader;
pub mod concurrent_reader;
pub mod pm25_reader;
pub mod text_decoder;

pub use combined_reader::{CombinedFile, CombinedReader};
pub use concurrent_reader::FileObservationSource;
pub use pm25_reader::Pm25Reader;

use crate::error::Result;
use crate::models::{CombinedObservation, Pm25Reading};

/// Everything the pipeline consumes, before any alignment or conversion.
#[derive(Debug, Clone, Default)]
pub struct RawObservations {
    /// Rows of the dedicated PM2.5 feeds, already attributed to their authoritative station.
    pub pm25_readings: Vec<Pm25Reading>,
    /// Rows of the combined source, with station names resolved against the registry.
    pub combined: Vec<CombinedObservation>,
}

/// Station time-series input of the pipeline.
pub trait ObservationSource {
    fn load(&self) -> Result<RawObservations>;
}

impl ObservationSource for RawObservations {
    fn load(&self) -> Result<RawObservations> {
        Ok(self.clone())
    }
}
