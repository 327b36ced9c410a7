use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::error::{ProcessingError, Result};

/// Canonical monitoring station name, e.g. `DKI1 (Bunderan HI)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StationId(String);

impl StationId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short code before the parenthesised location, e.g. `DKI1`.
    pub fn code(&self) -> &str {
        self.0.split_whitespace().next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(value: &str) -> Self {
        StationId::new(value)
    }
}

/// The monitored station set, the alias table used to normalise raw station names and the
/// subset of stations whose PM2.5 concentration comes from the dedicated PM2.5 source.
#[derive(Debug, Clone)]
pub struct StationRegistry {
    stations: BTreeSet<StationId>,
    aliases: HashMap<String, StationId>,
    pm25_authoritative: BTreeSet<StationId>,
}

impl StationRegistry {
    pub fn new<I>(stations: I) -> Self
    where
        I: IntoIterator<Item = StationId>,
    {
        Self {
            stations: stations.into_iter().collect(),
            aliases: HashMap::new(),
            pm25_authoritative: BTreeSet::new(),
        }
    }

    pub fn with_alias(mut self, raw: &str, canonical: StationId) -> Self {
        self.aliases.insert(raw.trim().to_string(), canonical);
        self
    }

    pub fn with_pm25_authority(mut self, station: StationId) -> Result<Self> {
        if !self.stations.contains(&station) {
            return Err(ProcessingError::UnknownStation(station.to_string()));
        }
        self.pm25_authoritative.insert(station);
        Ok(self)
    }

    /// Map a raw station name to a monitored station, applying aliases first.
    pub fn resolve(&self, raw: &str) -> Option<StationId> {
        let trimmed = raw.trim();
        let candidate = self
            .aliases
            .get(trimmed)
            .cloned()
            .unwrap_or_else(|| StationId::new(trimmed));

        self.stations.contains(&candidate).then_some(candidate)
    }

    pub fn contains(&self, station: &StationId) -> bool {
        self.stations.contains(station)
    }

    pub fn is_pm25_authoritative(&self, station: &StationId) -> bool {
        self.pm25_authoritative.contains(station)
    }

    /// Monitored stations in sorted order.
    pub fn stations(&self) -> impl Iterator<Item = &StationId> {
        self.stations.iter()
    }

    pub fn pm25_authoritative(&self) -> impl Iterator<Item = &StationId> {
        self.pm25_authoritative.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> StationRegistry {
        StationRegistry::new(["DKI1 (Bunderan HI)", "DKI5 (Kebon Jeruk)"].map(StationId::from))
            .with_alias(
                "DKI5 (Kebon Jeruk) Jakarta Barat",
                StationId::from("DKI5 (Kebon Jeruk)"),
            )
            .with_pm25_authority(StationId::from("DKI1 (Bunderan HI)"))
            .unwrap()
    }

    #[test]
    fn test_resolve_applies_aliases() {
        let registry = registry();

        assert_eq!(
            registry.resolve(" DKI5 (Kebon Jeruk) Jakarta Barat"),
            Some(StationId::from("DKI5 (Kebon Jeruk)"))
        );
        assert_eq!(
            registry.resolve("DKI1 (Bunderan HI)"),
            Some(StationId::from("DKI1 (Bunderan HI)"))
        );
        assert_eq!(registry.resolve("DKI9 (Nowhere)"), None);
    }

    #[test]
    fn test_pm25_authority_requires_monitored_station() {
        let registry = registry();
        assert!(registry.is_pm25_authoritative(&StationId::from("DKI1 (Bunderan HI)")));
        assert!(!registry.is_pm25_authoritative(&StationId::from("DKI5 (Kebon Jeruk)")));

        let err = registry.with_pm25_authority(StationId::from("DKI3 (Jagakarsa)"));
        assert!(matches!(err, Err(ProcessingError::UnknownStation(_))));
    }

    #[test]
    fn test_station_code() {
        assert_eq!(StationId::from("DKI3 (Jagakarsa)").code(), "DKI3");
    }
}
