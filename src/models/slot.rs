use serde::{Deserialize, Serialize};

/// Capacity assumed for a (date, period) slot that has no ledger row yet.
pub const DEFAULT_CAPACITY: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Morning,
    Afternoon,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Morning => "morning",
            Period::Afternoon => "afternoon",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "morning" => Some(Period::Morning),
            "afternoon" => Some(Period::Afternoon),
            _ => None,
        }
    }

    /// Human-readable time window shown in confirmation emails.
    pub fn time_window(&self) -> &'static str {
        match self {
            Period::Morning => "8:00 AM - 12:00 PM",
            Period::Afternoon => "1:00 PM - 5:00 PM",
        }
    }
}

/// Remaining capacity for both periods of one calendar date.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DayAvailability {
    pub morning: i64,
    pub afternoon: i64,
}
