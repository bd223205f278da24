use crate::attributes::{AttributeBag, AttributeError, AttributeKind};
use serde::{Deserialize, Serialize};

/// Currency amount in millionths of the account currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub micro_amount: i64,
}

impl Money {
    pub const fn from_micros(micro_amount: i64) -> Self {
        Self { micro_amount }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySearchVolume {
    pub year: i32,
    pub month: u8,
    /// Absent when the service has no data for the month.
    #[serde(default)]
    pub count: Option<i64>,
}

/// Volume, cost and competition metrics the service reports for a keyword text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdeaEstimate {
    pub search_volume: Option<i64>,
    pub average_cpc: Option<Money>,
    /// Relative competition in `[0, 1]`.
    pub competition: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monthly_searches: Vec<MonthlySearchVolume>,
}

impl IdeaEstimate {
    /// Build an estimate from the metric kinds in `bag`. Kinds that are absent
    /// stay empty; kinds present with the wrong value type are an error.
    pub fn from_attributes(bag: &AttributeBag) -> Result<Self, AttributeError> {
        Ok(Self {
            search_volume: bag.long(AttributeKind::SearchVolume)?,
            average_cpc: bag.money(AttributeKind::AverageCpc)?,
            competition: bag.double(AttributeKind::Competition)?,
            monthly_searches: bag
                .monthly_searches(AttributeKind::TargetedMonthlySearches)?
                .map(<[MonthlySearchVolume]>::to_vec)
                .unwrap_or_default(),
        })
    }
}
