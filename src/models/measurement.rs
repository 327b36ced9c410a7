use serde::{Deserialize, Serialize};

/// A numeric cell that distinguishes a measured zero from an absent measurement.
///
/// `Value` never holds zero, a negative number or NaN; use [`Measurement::from_f64`] to build
/// one from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Measurement {
    Value(f64),
    Zero,
    #[default]
    Missing,
}

impl Measurement {
    /// Classify a raw number. Negative and non-finite readings are invalid and become missing.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() || value < 0.0 {
            Measurement::Missing
        } else if value == 0.0 {
            Measurement::Zero
        } else {
            Measurement::Value(value)
        }
    }

    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or(Measurement::Missing, Self::from_f64)
    }

    /// Numeric value, with a measured zero reported as `0.0`.
    pub fn value(&self) -> Option<f64> {
        match self {
            Measurement::Value(v) => Some(*v),
            Measurement::Zero => Some(0.0),
            Measurement::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Measurement::Missing)
    }

    /// True for a strictly positive reading, i.e. one that carries information for the index.
    pub fn is_positive(&self) -> bool {
        matches!(self, Measurement::Value(_))
    }

    /// Value with missing treated as zero.
    pub fn or_zero(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }

    /// Apply `f` to a positive value; zero and missing pass through untouched.
    pub fn map_positive<F>(self, f: F) -> Self
    where
        F: FnOnce(f64) -> f64,
    {
        match self {
            Measurement::Value(v) => Measurement::from_f64(f(v)),
            other => other,
        }
    }

    /// Arithmetic mean over the non-missing values; missing when every input is missing.
    pub fn mean<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Measurement>,
    {
        let (sum, count) = values
            .into_iter()
            .filter_map(|m| m.value())
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

        if count == 0 {
            Measurement::Missing
        } else {
            Measurement::from_f64(sum / count as f64)
        }
    }
}

impl From<f64> for Measurement {
    fn from(value: f64) -> Self {
        Measurement::from_f64(value)
    }
}
