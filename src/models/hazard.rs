use tracing::debug;

use crate::config::ModelConfig;
use crate::models::{Metric, TimeSeries};

const MIN_STAMINA: f64 = 1e-6;

/// Inverse-square hazard. Stamina is floored upstream, so this stays finite.
pub fn hazard_from_stamina(stamina: f64, base_hazard: f64) -> f64 {
    let stamina = stamina.max(MIN_STAMINA);
    base_hazard / (stamina * stamina)
}

pub fn run_hazard_model(stamina: &TimeSeries, model: &ModelConfig) -> TimeSeries {
    debug!("running injury hazard model for {} players", stamina.len());
    stamina.map(Metric::InjuryHazard, |_, s| {
        hazard_from_stamina(s, model.base_hazard)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fatigue::stamina_curve;

    #[test]
    fn hazard_is_inverse_square_of_stamina() {
        let model = ModelConfig::default();
        let stamina = TimeSeries::from_curves(
            Metric::Stamina,
            [("p".to_string(), stamina_curve(0.009, model.stamina_floor))],
        );
        let hazard = run_hazard_model(&stamina, &model);
        assert_eq!(hazard.metric, Metric::InjuryHazard);
        for minute in 0..=90 {
            let s = stamina.at("p", minute).unwrap();
            let h = hazard.at("p", minute).unwrap();
            assert!((h - model.base_hazard / (s * s)).abs() < 1e-15);
        }
        let curve = hazard.curve("p").unwrap();
        for pair in curve.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn floored_stamina_bounds_hazard() {
        let bound = hazard_from_stamina(0.01, 0.0001);
        assert!((bound - 1.0).abs() < 1e-9);
        assert!(hazard_from_stamina(0.0, 0.0001).is_finite());
    }
}
