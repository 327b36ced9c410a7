//! Conversion between a pollutant concentration and its sub-index.
//!
//! Both directions interpolate linearly towards the upper breakpoint `(Xa, Ia)` of the
//! segment holding the value, but the lower anchor `(Xb, Ib)` is always taken from the
//! bottom of the table: `(0, 0)` while the value is inside the first segment, otherwise the
//! first breakpoint itself. Values in the first two segments therefore match the textbook
//! per-segment formula, while higher segments are interpolated along a line that starts at
//! the first breakpoint. Historical published tables were produced this way, so the rule is
//! kept as is. Values above the last breakpoint are extrapolated along the last segment
//! rather than rejected.

use crate::aqi::breakpoints::BreakpointTable;
use crate::error::Result;
use crate::models::{Measurement, Pollutant};
use crate::utils::rounding::{round_half_even, round_to};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ConcentrationToIndex,
    IndexToConcentration,
}

/// Sub-index for a concentration, rounded to an integer. Zero and missing pass through.
pub fn concentration_to_index(pollutant: Pollutant, concentration: Measurement) -> Measurement {
    let Measurement::Value(x) = concentration else {
        return concentration;
    };

    let table = BreakpointTable::for_pollutant(pollutant);
    let upper = table.upper_for_concentration(x);
    let first = table.first();

    let (xa, ia) = (upper.concentration, upper.index_high as f64);
    let (xb, ib) = if x > first.concentration {
        (first.concentration, first.index_high as f64)
    } else {
        (0.0, 0.0)
    };

    Measurement::from_f64(round_half_even((ia - ib) / (xa - xb) * (x - xb) + ib))
}

/// Concentration for a sub-index, rounded to one decimal. Zero and missing pass through.
pub fn index_to_concentration(pollutant: Pollutant, index: Measurement) -> Measurement {
    let Measurement::Value(i) = index else {
        return index;
    };

    let table = BreakpointTable::for_pollutant(pollutant);
    let upper = table.upper_for_index(i);
    let first = table.first();

    let (xa, ia) = (upper.concentration, upper.index_high as f64);
    let (xb, ib) = if i > first.index_high as f64 {
        (first.concentration, first.index_high as f64)
    } else {
        (0.0, 0.0)
    };

    Measurement::from_f64(round_to((xa - xb) / (ia - ib) * (i - ib) + xb, 1))
}

/// Convert a single value for a pollutant given by its key, e.g. `"pm25"`.
///
/// Fails with [`crate::ProcessingError::UnsupportedPollutant`] for unknown keys.
pub fn convert(pollutant_key: &str, direction: Direction, value: f64) -> Result<Measurement> {
    let pollutant: Pollutant = pollutant_key.parse()?;
    let value = Measurement::from_f64(value);

    Ok(match direction {
        Direction::ConcentrationToIndex => concentration_to_index(pollutant, value),
        Direction::IndexToConcentration => index_to_concentration(pollutant, value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;

    fn index(pollutant: Pollutant, concentration: f64) -> f64 {
        concentration_to_index(pollutant, Measurement::from_f64(concentration)).or_zero()
    }

    fn concentration(pollutant: Pollutant, index: f64) -> f64 {
        index_to_concentration(pollutant, Measurement::from_f64(index)).or_zero()
    }

    #[test]
    fn test_zero_and_missing_propagate() {
        for pollutant in Pollutant::ALL {
            assert_eq!(
                concentration_to_index(pollutant, Measurement::Zero),
                Measurement::Zero
            );
            assert_eq!(
                index_to_concentration(pollutant, Measurement::Zero),
                Measurement::Zero
            );
            assert_eq!(
                concentration_to_index(pollutant, Measurement::Missing),
                Measurement::Missing
            );
            assert_eq!(
                index_to_concentration(pollutant, Measurement::Missing),
                Measurement::Missing
            );
        }
    }

    #[test]
    fn test_first_segment_interpolates_from_origin() {
        // 50 / 15.5 * 10 = 32.26
        assert_eq!(index(Pollutant::Pm25, 10.0), 32.0);
        assert_eq!(index(Pollutant::Pm10, 25.0), 25.0);
        assert_eq!(concentration(Pollutant::Pm10, 25.0), 25.0);
    }

    #[test]
    fn test_breakpoint_boundaries_hit_index_maximum() {
        assert_eq!(index(Pollutant::Pm25, 15.5), 50.0);

        for pollutant in Pollutant::ALL {
            let table = BreakpointTable::for_pollutant(pollutant);
            for breakpoint in table.breakpoints() {
                assert_eq!(
                    index(pollutant, breakpoint.concentration),
                    breakpoint.index_high as f64,
                    "{pollutant} at {}",
                    breakpoint.concentration
                );
            }
        }
    }

    #[test]
    fn test_monotonic_within_lowest_breakpoint() {
        for pollutant in Pollutant::ALL {
            let limit = BreakpointTable::for_pollutant(pollutant).first().concentration;
            let mut previous = 0.0;
            for step in 1..=100 {
                let value = index(pollutant, limit * step as f64 / 100.0);
                assert!(value >= previous, "{pollutant} step {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn test_higher_segments_anchor_on_first_breakpoint() {
        // (200 - 50) / (150.4 - 15.5) * (100 - 15.5) + 50 = 143.96; per-segment interpolation
        // between 55.4 and 150.4 would give 147.
        assert_eq!(index(Pollutant::Pm25, 100.0), 144.0);
        // (100 - 50) / (150 - 50) * (100 - 50) + 50
        assert_eq!(index(Pollutant::Pm10, 100.0), 75.0);
    }

    #[test]
    fn test_extrapolates_above_table() {
        // (301 - 50) / (500 - 15.5) * (600 - 15.5) + 50 = 352.8
        assert_eq!(index(Pollutant::Pm25, 600.0), 353.0);
        // (500 - 15.5) / (301 - 50) * (400 - 50) + 15.5 = 691.1
        assert_eq!(concentration(Pollutant::Pm25, 400.0), 691.1);
    }

    #[test]
    fn test_index_to_concentration_stays_within_segment() {
        for pollutant in Pollutant::ALL {
            let table = BreakpointTable::for_pollutant(pollutant);
            let breakpoints = table.breakpoints();

            for (position, breakpoint) in breakpoints.iter().enumerate() {
                let lower = if position == 0 {
                    0.0
                } else {
                    breakpoints[position - 1].concentration
                };

                // Segments three and four are interpolated from the first breakpoint, so
                // their low end can dip below the previous breakpoint (PM10 segment four,
                // SO2/CO/O3 segment three). They still never fall below the first breakpoint.
                let floor = if position < 2 || position == breakpoints.len() - 1 {
                    lower
                } else {
                    table.first().concentration
                };

                for i in breakpoint.index_low..=breakpoint.index_high {
                    let value = concentration(pollutant, i as f64);
                    assert!(value <= breakpoint.concentration, "{pollutant} index {i}");
                    assert!(value >= floor, "{pollutant} index {i}");
                }
            }
        }
    }

    #[test]
    fn test_bottom_anchor_can_undershoot_previous_breakpoint() {
        // 52 + (400 - 52) / (200 - 50) * (101 - 50) = 170.3, under the 180 breakpoint.
        assert_eq!(concentration(Pollutant::So2, 101.0), 170.3);
        assert!(concentration(Pollutant::So2, 110.0) > 180.0);
        // 50 + (420 - 50) / (300 - 50) * (201 - 50) = 273.5, under the 350 breakpoint.
        assert_eq!(concentration(Pollutant::Pm10, 201.0), 273.5);
    }

    #[test]
    fn test_index_to_concentration_rounds_to_one_decimal() {
        // 15.5 + (150.4 - 15.5) / 150 * 100 = 105.433
        assert_eq!(concentration(Pollutant::Pm25, 150.0), 105.4);
        assert_eq!(concentration(Pollutant::Pm25, 50.0), 15.5);
    }

    #[test]
    fn test_convert_by_key() {
        let value = convert("pm25", Direction::ConcentrationToIndex, 10.0).unwrap();
        assert_eq!(value, Measurement::Value(32.0));

        let value = convert("NO2", Direction::IndexToConcentration, 0.0).unwrap();
        assert_eq!(value, Measurement::Zero);

        let err = convert("benzene", Direction::ConcentrationToIndex, 3.0).unwrap_err();
        assert!(matches!(err, ProcessingError::UnsupportedPollutant(key) if key == "benzene"));
    }
}
