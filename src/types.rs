use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::{InputConfig, InputPolicy, MatchDefaults};
use crate::roster::PlayerId;

pub const FINAL_MINUTE: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub minute: u32,
    pub wbgt: f64,
    pub altitude_m: f64,
    pub risk_aversion: f64,
}

impl MatchState {
    pub fn new(minute: u32, wbgt: f64, altitude_m: f64, risk_aversion: f64) -> Self {
        Self {
            minute,
            wbgt,
            altitude_m,
            risk_aversion,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("{field} = {value} is outside {min}..={max}")]
pub struct MatchStateError {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// Raw match-state request. Missing fields fall back to configured defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStateInput {
    pub minute: Option<i64>,
    pub wbgt: Option<f64>,
    pub altitude_m: Option<f64>,
    pub risk_aversion: Option<f64>,
}

impl MatchStateInput {
    pub fn resolve(
        &self,
        defaults: &MatchDefaults,
        limits: &InputConfig,
    ) -> Result<MatchState, MatchStateError> {
        let minute = bound(
            "minute",
            self.minute.map(|m| m as f64),
            f64::from(defaults.minute),
            0.0,
            f64::from(FINAL_MINUTE),
            limits.policy,
        )?;
        let wbgt = bound(
            "wbgt",
            self.wbgt,
            defaults.wbgt,
            0.0,
            limits.max_wbgt,
            limits.policy,
        )?;
        let altitude_m = bound(
            "altitude_m",
            self.altitude_m,
            defaults.altitude_m,
            0.0,
            limits.max_altitude_m,
            limits.policy,
        )?;
        let risk_aversion = bound(
            "risk_aversion",
            self.risk_aversion,
            defaults.risk_aversion,
            0.0,
            f64::MAX,
            limits.policy,
        )?;
        Ok(MatchState {
            minute: minute.round() as u32,
            wbgt,
            altitude_m,
            risk_aversion,
        })
    }
}

fn bound(
    field: &'static str,
    value: Option<f64>,
    default: f64,
    min: f64,
    max: f64,
    policy: InputPolicy,
) -> Result<f64, MatchStateError> {
    let max = max.max(min);
    let Some(value) = value else {
        return Ok(default.clamp(min, max));
    };
    if value.is_finite() && (min..=max).contains(&value) {
        return Ok(value);
    }
    match policy {
        InputPolicy::Reject => Err(MatchStateError {
            field,
            value,
            min,
            max,
        }),
        InputPolicy::Clamp => {
            let clamped = if value.is_finite() {
                value.clamp(min, max)
            } else {
                default.clamp(min, max)
            };
            warn!("{field} = {value} out of range, using {clamped}");
            Ok(clamped)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionRecommendation {
    /// `None` on both sides means no substitution is possible.
    pub out_player: Option<PlayerId>,
    pub in_player: Option<PlayerId>,
    pub at_minute: u32,
    pub score: f64,
    pub delta_value: f64,
    pub delta_risk: f64,
    pub delta_risk_percent: f64,
}

impl SubstitutionRecommendation {
    pub fn none(at_minute: u32) -> Self {
        Self {
            out_player: None,
            in_player: None,
            at_minute,
            score: 0.0,
            delta_value: 0.0,
            delta_risk: 0.0,
            delta_risk_percent: 0.0,
        }
    }

    pub fn is_none(&self) -> bool {
        self.out_player.is_none() || self.in_player.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressingLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for PressingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressingDecision {
    pub level: PressingLevel,
    pub mean_stamina: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub match_state: MatchState,
    pub substitution: SubstitutionRecommendation,
    pub pressing: PressingDecision,
    pub rating_source: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRow {
    pub minute: u32,
    pub player_id: PlayerId,
    pub stamina: f64,
    pub injury_hazard: f64,
    pub evpm: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advice {
    pub recommendation: Recommendation,
    pub timeline: Vec<TimelineRow>,
}
