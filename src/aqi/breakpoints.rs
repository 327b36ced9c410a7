//! Tabulated concentration breakpoints for the six index pollutants.
//!
//! Concentrations are in µg/m³. Each breakpoint closes a category segment: every
//! concentration up to and including `concentration` (and above the previous breakpoint)
//! belongs to the index range `index_low..=index_high`. The final segment is the single
//! point 301, the hazardous ceiling.

use crate::models::Pollutant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub concentration: f64,
    pub index_low: u32,
    pub index_high: u32,
}

impl Breakpoint {
    const fn new(concentration: f64, index_low: u32, index_high: u32) -> Self {
        Self {
            concentration,
            index_low,
            index_high,
        }
    }

    pub fn contains_index(&self, index: f64) -> bool {
        index >= self.index_low as f64 && index <= self.index_high as f64
    }
}

/// Index segments shared by every pollutant.
const fn segments(c1: f64, c2: f64, c3: f64, c4: f64, c5: f64) -> [Breakpoint; 5] {
    [
        Breakpoint::new(c1, 1, 50),
        Breakpoint::new(c2, 51, 100),
        Breakpoint::new(c3, 101, 200),
        Breakpoint::new(c4, 201, 300),
        Breakpoint::new(c5, 301, 301),
    ]
}

static PM25: [Breakpoint; 5] = segments(15.5, 55.4, 150.4, 250.4, 500.0);
static PM10: [Breakpoint; 5] = segments(50.0, 150.0, 350.0, 420.0, 500.0);
static SO2: [Breakpoint; 5] = segments(52.0, 180.0, 400.0, 800.0, 1200.0);
static CO: [Breakpoint; 5] = segments(4000.0, 8000.0, 15000.0, 30000.0, 45000.0);
static O3: [Breakpoint; 5] = segments(120.0, 235.0, 400.0, 800.0, 1000.0);
static NO2: [Breakpoint; 5] = segments(80.0, 200.0, 1130.0, 2260.0, 3000.0);

/// Ordered, non-empty breakpoint list of one pollutant.
#[derive(Debug, Clone, Copy)]
pub struct BreakpointTable {
    breakpoints: &'static [Breakpoint],
}

impl BreakpointTable {
    pub fn for_pollutant(pollutant: Pollutant) -> Self {
        let breakpoints: &'static [Breakpoint] = match pollutant {
            Pollutant::Pm25 => &PM25,
            Pollutant::Pm10 => &PM10,
            Pollutant::So2 => &SO2,
            Pollutant::Co => &CO,
            Pollutant::O3 => &O3,
            Pollutant::No2 => &NO2,
        };

        Self { breakpoints }
    }

    pub fn breakpoints(&self) -> &'static [Breakpoint] {
        self.breakpoints
    }

    pub fn first(&self) -> &'static Breakpoint {
        &self.breakpoints[0]
    }

    pub fn last(&self) -> &'static Breakpoint {
        &self.breakpoints[self.breakpoints.len() - 1]
    }

    /// Smallest breakpoint whose concentration is at or above `concentration`, or the highest
    /// breakpoint when the value is off the table.
    pub fn upper_for_concentration(&self, concentration: f64) -> &'static Breakpoint {
        self.breakpoints
            .iter()
            .find(|b| concentration <= b.concentration)
            .unwrap_or_else(|| self.last())
    }

    /// Breakpoint whose index range holds `index`, or the highest breakpoint when the value
    /// is off the table. Fractional indices between two integer ranges fall in the upper one.
    pub fn upper_for_index(&self, index: f64) -> &'static Breakpoint {
        self.breakpoints
            .iter()
            .find(|b| index <= b.index_high as f64)
            .unwrap_or_else(|| self.last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_strictly_increasing_and_contiguous() {
        for pollutant in Pollutant::ALL {
            let table = BreakpointTable::for_pollutant(pollutant);
            let breakpoints = table.breakpoints();

            assert_eq!(breakpoints.len(), 5, "{pollutant}");
            assert_eq!(table.first().index_low, 1);
            for pair in breakpoints.windows(2) {
                assert!(pair[0].concentration < pair[1].concentration, "{pollutant}");
                assert_eq!(pair[0].index_high + 1, pair[1].index_low, "{pollutant}");
            }

            let last = table.last();
            assert_eq!(last.index_low, last.index_high);
            assert_eq!(last.index_high, 301);
        }
    }

    #[test]
    fn test_upper_for_concentration() {
        let table = BreakpointTable::for_pollutant(Pollutant::Pm25);

        assert_eq!(table.upper_for_concentration(10.0).concentration, 15.5);
        assert_eq!(table.upper_for_concentration(15.5).concentration, 15.5);
        assert_eq!(table.upper_for_concentration(15.6).concentration, 55.4);
        assert_eq!(table.upper_for_concentration(900.0).concentration, 500.0);
    }

    #[test]
    fn test_upper_for_index() {
        let table = BreakpointTable::for_pollutant(Pollutant::So2);

        assert_eq!(table.upper_for_index(50.0).concentration, 52.0);
        assert_eq!(table.upper_for_index(51.0).concentration, 180.0);
        assert_eq!(table.upper_for_index(50.5).index_high, 100);
        assert!(table.upper_for_index(150.0).contains_index(150.0));
        assert_eq!(table.upper_for_index(450.0).index_high, 301);
    }
}
