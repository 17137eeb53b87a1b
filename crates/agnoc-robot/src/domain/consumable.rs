use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableType {
    MainBrush,
    SideBrush,
    Filter,
    Dishcloth,
}

impl ConsumableType {
    pub const ALL: [ConsumableType; 4] = [
        Self::MainBrush,
        Self::SideBrush,
        Self::Filter,
        Self::Dishcloth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MainBrush => "main_brush",
            Self::SideBrush => "side_brush",
            Self::Filter => "filter",
            Self::Dishcloth => "dishcloth",
        }
    }

    /// Item id the device expects in a reset request.
    pub fn reset_item_id(self) -> u32 {
        match self {
            Self::MainBrush => 1,
            Self::SideBrush => 2,
            Self::Filter => 3,
            Self::Dishcloth => 4,
        }
    }
}

impl FromStr for ConsumableType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::InvalidArgument(format!("invalid consumable: {s}")))
    }
}

impl fmt::Display for ConsumableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wear of one consumable, in minutes of use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceConsumable {
    pub kind: ConsumableType,
    pub used: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys_only() {
        assert_eq!(
            "side_brush".parse::<ConsumableType>().unwrap(),
            ConsumableType::SideBrush
        );
        assert!(matches!(
            "mop_pad".parse::<ConsumableType>(),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn reset_ids() {
        let ids: Vec<u32> = ConsumableType::ALL.iter().map(|c| c.reset_item_id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }
}
