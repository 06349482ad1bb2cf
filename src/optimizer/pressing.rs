use tracing::debug;

use crate::models::TimeSeries;
use crate::roster::Roster;
use crate::types::{MatchState, PressingDecision, PressingLevel};

pub const HIGH_PRESS_ABOVE: f64 = 0.70;
pub const MEDIUM_PRESS_ABOVE: f64 = 0.50;

/// Both thresholds are exclusive: exactly 0.70 is Medium, exactly 0.50 is Low.
pub fn classify_pressing(mean_stamina: f64) -> PressingLevel {
    if mean_stamina > HIGH_PRESS_ABOVE {
        PressingLevel::High
    } else if mean_stamina > MEDIUM_PRESS_ABOVE {
        PressingLevel::Medium
    } else {
        PressingLevel::Low
    }
}

pub fn pressing_from_mean(mean_stamina: f64) -> PressingDecision {
    PressingDecision {
        level: classify_pressing(mean_stamina),
        mean_stamina,
        rationale: format!("Avg. stamina is {:.0}%", mean_stamina * 100.0),
    }
}

pub fn decide_pressing(state: &MatchState, roster: &Roster, stamina: &TimeSeries) -> PressingDecision {
    let current = roster
        .pitch()
        .iter()
        .filter_map(|entry| stamina.at(&entry.id, state.minute))
        .collect::<Vec<_>>();
    if current.is_empty() {
        return PressingDecision {
            level: PressingLevel::Low,
            mean_stamina: 0.0,
            rationale: "No players on the pitch".to_string(),
        };
    }
    let mean = current.iter().sum::<f64>() / current.len() as f64;
    debug!("mean on-pitch stamina at minute {} is {mean:.3}", state.minute);
    pressing_from_mean(mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;
    use crate::roster::tests::attrs;
    use crate::roster::{Position, RosterEntry};

    #[test]
    fn thresholds_are_exclusive_on_the_upper_side() {
        assert_eq!(classify_pressing(0.85), PressingLevel::High);
        assert_eq!(classify_pressing(0.70), PressingLevel::Medium);
        assert_eq!(classify_pressing(0.6), PressingLevel::Medium);
        assert_eq!(classify_pressing(0.50), PressingLevel::Low);
        assert_eq!(classify_pressing(0.40), PressingLevel::Low);
    }

    #[test]
    fn averages_pitch_players_only_at_current_minute() {
        let roster = Roster::new(
            vec![
                RosterEntry::new("a", attrs(Position::Forward, 75.0)),
                RosterEntry::new("b", attrs(Position::Defender, 75.0)),
            ],
            vec![RosterEntry::new("c", attrs(Position::Midfielder, 75.0))],
        )
        .unwrap();
        let stamina = TimeSeries::from_curves(
            Metric::Stamina,
            [
                ("a".to_string(), vec![1.0, 0.9, 0.8]),
                ("b".to_string(), vec![1.0, 0.7, 0.6]),
                ("c".to_string(), vec![1.0, 0.1, 0.1]),
            ],
        );
        let decision = decide_pressing(&MatchState::new(2, 25.0, 0.0, 1.0), &roster, &stamina);
        assert!((decision.mean_stamina - 0.7).abs() < 1e-12);
        assert_eq!(decision.rationale, "Avg. stamina is 70%");

        let decision = decide_pressing(&MatchState::new(1, 25.0, 0.0, 1.0), &roster, &stamina);
        assert_eq!(decision.level, PressingLevel::High);
    }

    #[test]
    fn empty_pitch_presses_low() {
        let roster = Roster::new(vec![], vec![]).unwrap();
        let stamina = TimeSeries::from_curves(Metric::Stamina, Vec::new());
        let decision = decide_pressing(&MatchState::new(10, 25.0, 0.0, 1.0), &roster, &stamina);
        assert_eq!(decision.level, PressingLevel::Low);
    }
}
