pub mod fatigue;
pub mod hazard;
pub mod value;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::roster::PlayerId;
use crate::types::FINAL_MINUTE;

pub const MINUTES: usize = FINAL_MINUTE as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Stamina,
    InjuryHazard,
    Evpm,
}

impl Display for Metric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stamina => write!(f, "stamina"),
            Self::InjuryHazard => write!(f, "injury_hazard"),
            Self::Evpm => write!(f, "evpm"),
        }
    }
}

/// Per-player, per-minute values of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub metric: Metric,
    curves: BTreeMap<PlayerId, Vec<f64>>,
}

impl TimeSeries {
    pub fn from_curves<I>(metric: Metric, curves: I) -> Self
    where
        I: IntoIterator<Item = (PlayerId, Vec<f64>)>,
    {
        Self {
            metric,
            curves: curves.into_iter().collect(),
        }
    }

    pub fn curve(&self, player: &str) -> Option<&[f64]> {
        self.curves.get(player).map(Vec::as_slice)
    }

    pub fn at(&self, player: &str, minute: u32) -> Option<f64> {
        self.curve(player)?.get(minute as usize).copied()
    }

    /// Sum of the player's curve over `[from_minute, 90]`. Unknown players sum to zero.
    pub fn sum_from(&self, player: &str, from_minute: u32) -> f64 {
        self.curve(player)
            .map(|curve| curve.iter().skip(from_minute as usize).sum::<f64>())
            .unwrap_or(0.0)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.curves.keys()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn map(&self, metric: Metric, f: impl Fn(&str, f64) -> f64) -> Self {
        let curves = self
            .curves
            .iter()
            .map(|(player, curve)| {
                let mapped = curve.iter().map(|v| f(player.as_str(), *v)).collect::<Vec<_>>();
                (player.clone(), mapped)
            })
            .collect();
        Self { metric, curves }
    }
}

#[cfg(test)]
mod tests {
    use super::{Metric, TimeSeries};

    #[test]
    fn sums_tail_of_curve() {
        let series = TimeSeries::from_curves(
            Metric::Stamina,
            [("a".to_string(), vec![1.0, 2.0, 3.0, 4.0])],
        );
        assert_eq!(series.sum_from("a", 0), 10.0);
        assert_eq!(series.sum_from("a", 2), 7.0);
        assert_eq!(series.sum_from("a", 9), 0.0);
        assert_eq!(series.sum_from("missing", 0), 0.0);
        assert_eq!(series.at("a", 3), Some(4.0));
        assert_eq!(series.at("a", 4), None);
    }
}
