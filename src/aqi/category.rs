use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Health category of a station-day, ordered from cleanest to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthCategory {
    NoData,
    Good,
    Moderate,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

/// Which naming the category labels are published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelLanguage {
    #[default]
    Ispu,
    English,
}

const TABULATED: [(RangeInclusive<u32>, HealthCategory); 4] = [
    (1..=50, HealthCategory::Good),
    (51..=100, HealthCategory::Moderate),
    (101..=200, HealthCategory::Unhealthy),
    (201..=300, HealthCategory::VeryUnhealthy),
];

const HAZARDOUS_FROM: u32 = 301;

impl HealthCategory {
    pub const ALL: [HealthCategory; 6] = [
        HealthCategory::NoData,
        HealthCategory::Good,
        HealthCategory::Moderate,
        HealthCategory::Unhealthy,
        HealthCategory::VeryUnhealthy,
        HealthCategory::Hazardous,
    ];

    /// Category of a rounded composite index.
    pub fn from_composite(composite: u32) -> Self {
        if composite == 0 {
            return HealthCategory::NoData;
        }

        TABULATED
            .iter()
            .find(|(range, _)| range.contains(&composite))
            .map(|(_, category)| *category)
            .unwrap_or_else(|| {
                debug_assert!(composite >= HAZARDOUS_FROM);
                HealthCategory::Hazardous
            })
    }

    pub fn ispu_label(&self) -> &'static str {
        match self {
            HealthCategory::NoData => "TIDAK ADA DATA",
            HealthCategory::Good => "BAIK",
            HealthCategory::Moderate => "SEDANG",
            HealthCategory::Unhealthy => "TIDAK SEHAT",
            HealthCategory::VeryUnhealthy => "SANGAT TIDAK SEHAT",
            HealthCategory::Hazardous => "BERBAHAYA",
        }
    }

    pub fn english_label(&self) -> &'static str {
        match self {
            HealthCategory::NoData => "NO DATA",
            HealthCategory::Good => "GOOD",
            HealthCategory::Moderate => "MODERATE",
            HealthCategory::Unhealthy => "UNHEALTHY",
            HealthCategory::VeryUnhealthy => "VERY UNHEALTHY",
            HealthCategory::Hazardous => "HAZARDOUS",
        }
    }

    pub fn label(&self, language: LabelLanguage) -> &'static str {
        match language {
            LabelLanguage::Ispu => self.ispu_label(),
            LabelLanguage::English => self.english_label(),
        }
    }

    pub fn has_data(&self) -> bool {
        !matches!(self, HealthCategory::NoData)
    }
}

impl std::fmt::Display for HealthCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.english_label())
    }
}
