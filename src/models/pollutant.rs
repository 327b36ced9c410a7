use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::error::ProcessingError;

/// The six pollutants that make up the composite index.
///
/// Declaration order is the column order of the output table and the tie-break order when
/// choosing the dominant pollutant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pollutant {
    Pm25,
    Pm10,
    So2,
    Co,
    O3,
    No2,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::So2,
        Pollutant::Co,
        Pollutant::O3,
        Pollutant::No2,
    ];

    /// Pollutants whose combined-source column holds a sub-index rather than a concentration.
    pub const INDEX_REPORTED: [Pollutant; 5] = [
        Pollutant::Pm10,
        Pollutant::So2,
        Pollutant::Co,
        Pollutant::O3,
        Pollutant::No2,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
            Pollutant::O3 => "o3",
            Pollutant::No2 => "no2",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::So2 => "SO2",
            Pollutant::Co => "CO",
            Pollutant::O3 => "O3",
            Pollutant::No2 => "NO2",
        }
    }

    /// Upper-case key used in the `critical` output column.
    pub fn critical_label(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM25",
            Pollutant::Pm10 => "PM10",
            Pollutant::So2 => "SO2",
            Pollutant::Co => "CO",
            Pollutant::O3 => "O3",
            Pollutant::No2 => "NO2",
        }
    }

    /// Output header of the concentration column, e.g. `so2(ug/m3)`.
    pub fn concentration_column(&self) -> String {
        format!("{}(ug/m3)", self.key())
    }

    pub fn index_column(&self) -> &'static str {
        self.key()
    }

    pub fn position(&self) -> usize {
        *self as usize
    }
}

impl FromStr for Pollutant {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pm25" | "pm2.5" | "pm2,5" => Ok(Pollutant::Pm25),
            "pm10" => Ok(Pollutant::Pm10),
            "so2" => Ok(Pollutant::So2),
            "co" => Ok(Pollutant::Co),
            "o3" => Ok(Pollutant::O3),
            "no2" => Ok(Pollutant::No2),
            _ => Err(ProcessingError::UnsupportedPollutant(s.to_string())),
        }
    }
}

impl std::fmt::Display for Pollutant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One value per pollutant, addressed by [`Pollutant`] and iterated in column order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PollutantValues<T>([T; 6]);

impl<T> PollutantValues<T> {
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Pollutant) -> T,
    {
        Self(Pollutant::ALL.map(&mut f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, &T)> {
        Pollutant::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U, F>(&self, mut f: F) -> PollutantValues<U>
    where
        F: FnMut(Pollutant, &T) -> U,
    {
        PollutantValues::from_fn(|p| f(p, &self.0[p.position()]))
    }
}

impl<T> Index<Pollutant> for PollutantValues<T> {
    type Output = T;

    fn index(&self, pollutant: Pollutant) -> &T {
        &self.0[pollutant.position()]
    }
}

impl<T> IndexMut<Pollutant> for PollutantValues<T> {
    fn index_mut(&mut self, pollutant: Pollutant) -> &mut T {
        &mut self.0[pollutant.position()]
    }
}
