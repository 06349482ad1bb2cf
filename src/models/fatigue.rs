use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::ModelConfig;
use crate::models::{Metric, TimeSeries, MINUTES};
use crate::roster::{Roster, RosterEntry};
use crate::types::MatchState;

/// Base fatigue rate in `[base_fatigue_min, base_fatigue_max)`, derived from a
/// digest of the seed and player id so repeated runs agree.
pub fn base_fatigue_rate(player_id: &str, model: &ModelConfig) -> f64 {
    let mut hasher = Sha256::new();
    hasher.update(model.fatigue_seed.as_bytes());
    hasher.update(b":");
    hasher.update(player_id.as_bytes());
    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let unit = (u64::from_be_bytes(head) >> 11) as f64 / (1u64 << 53) as f64;
    let span = (model.base_fatigue_max - model.base_fatigue_min).max(0.0);
    model.base_fatigue_min + span * unit
}

pub fn physicality_factor(physicality: f64, model: &ModelConfig) -> f64 {
    1.0 - (physicality - model.physicality_reference) * model.physicality_slope
}

pub fn heat_factor(wbgt: f64, model: &ModelConfig) -> f64 {
    1.0 + ((wbgt - model.reference_wbgt).max(0.0) / 10.0) * model.heat_penalty_per_10c
}

pub fn altitude_factor(altitude_m: f64, model: &ModelConfig) -> f64 {
    1.0 + (altitude_m / 1000.0) * model.altitude_penalty_per_1000m
}

pub fn fatigue_rate(entry: &RosterEntry, state: &MatchState, model: &ModelConfig) -> f64 {
    let rate = base_fatigue_rate(&entry.id, model)
        * physicality_factor(entry.attributes.physicality, model)
        * heat_factor(state.wbgt, model)
        * altitude_factor(state.altitude_m, model);
    rate.max(0.0)
}

pub fn stamina_curve(rate: f64, floor: f64) -> Vec<f64> {
    let floor = if floor.is_nan() {
        f64::MIN_POSITIVE
    } else {
        floor.clamp(f64::MIN_POSITIVE, 1.0)
    };
    (0..MINUTES)
        .map(|minute| (1.0 - minute as f64 * rate).clamp(floor, 1.0))
        .collect()
}

pub fn run_fatigue_model(state: &MatchState, roster: &Roster, model: &ModelConfig) -> TimeSeries {
    debug!(
        "running fatigue model: wbgt={} altitude={} players={}",
        state.wbgt,
        state.altitude_m,
        roster.len()
    );
    TimeSeries::from_curves(
        Metric::Stamina,
        roster.all().map(|entry| {
            let rate = fatigue_rate(entry, state, model);
            (entry.id.clone(), stamina_curve(rate, model.stamina_floor))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::tests::attrs;
    use crate::roster::{Position, RosterEntry};

    fn state(wbgt: f64, altitude_m: f64) -> MatchState {
        MatchState::new(0, wbgt, altitude_m, 1.0)
    }

    #[test]
    fn base_rate_is_deterministic_and_bounded() {
        let model = ModelConfig::default();
        let first = base_fatigue_rate("P1_Adams", &model);
        assert_eq!(first, base_fatigue_rate("P1_Adams", &model));
        for id in ["P1_Adams", "P2_Pulisic", "P17_Weah", "x", ""] {
            let rate = base_fatigue_rate(id, &model);
            assert!((0.005..0.008).contains(&rate), "{id} -> {rate}");
        }
        let reseeded = ModelConfig {
            fatigue_seed: "second-half".to_string(),
            ..ModelConfig::default()
        };
        assert_ne!(first, base_fatigue_rate("P1_Adams", &reseeded));
    }

    #[test]
    fn environmental_factors_match_reference_points() {
        let model = ModelConfig::default();
        assert!((heat_factor(25.0, &model) - 1.0).abs() < 1e-12);
        assert!((heat_factor(20.0, &model) - 1.0).abs() < 1e-12);
        assert!((heat_factor(35.0, &model) - 1.5).abs() < 1e-12);
        assert!((altitude_factor(0.0, &model) - 1.0).abs() < 1e-12);
        assert!((altitude_factor(1000.0, &model) - 1.1).abs() < 1e-12);
        assert!((physicality_factor(75.0, &model) - 1.0).abs() < 1e-12);
        assert!((physicality_factor(85.0, &model) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn stamina_starts_full_and_never_increases() {
        let model = ModelConfig::default();
        let roster = Roster::new(
            vec![
                RosterEntry::new("strong", attrs(Position::Defender, 95.0)),
                RosterEntry::new("weak", attrs(Position::Forward, 50.0)),
            ],
            vec![],
        )
        .unwrap();
        let series = run_fatigue_model(&state(34.0, 2400.0), &roster, &model);
        for player in ["strong", "weak"] {
            let curve = series.curve(player).unwrap();
            assert_eq!(curve.len(), MINUTES);
            assert_eq!(curve[0], 1.0);
            for pair in curve.windows(2) {
                assert!(pair[1] <= pair[0]);
            }
            assert!(curve.iter().all(|s| *s > 0.0 && *s <= 1.0));
        }
    }

    #[test]
    fn stamina_is_floored() {
        let curve = stamina_curve(0.05, 0.01);
        assert_eq!(curve[90], 0.01);
        assert!((curve[10] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn nan_floor_does_not_break_the_curve() {
        let curve = stamina_curve(0.05, f64::NAN);
        assert_eq!(curve.len(), MINUTES);
        assert_eq!(curve[0], 1.0);
        assert!(curve.iter().all(|s| *s > 0.0 && *s <= 1.0));
    }

    #[test]
    fn heat_and_altitude_speed_up_fatigue() {
        let model = ModelConfig::default();
        let entry = RosterEntry::new("p", attrs(Position::Midfielder, 75.0));
        let mild = fatigue_rate(&entry, &state(25.0, 0.0), &model);
        let harsh = fatigue_rate(&entry, &state(35.0, 1000.0), &model);
        assert!((harsh / mild - 1.5 * 1.1).abs() < 1e-9);
    }
}
