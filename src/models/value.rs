use std::collections::BTreeMap;

use tracing::debug;

use crate::config::ModelConfig;
use crate::models::{Metric, TimeSeries};
use crate::rating::RatingPredictor;
use crate::roster::{PlayerId, Roster};

pub fn base_ratings(roster: &Roster, predictor: &dyn RatingPredictor) -> BTreeMap<PlayerId, f64> {
    roster
        .all()
        .map(|entry| (entry.id.clone(), predictor.predict(&entry.attributes)))
        .collect()
}

pub fn run_value_model(
    roster: &Roster,
    stamina: &TimeSeries,
    predictor: &dyn RatingPredictor,
    model: &ModelConfig,
) -> TimeSeries {
    debug!("running EVPM model with {} rating", predictor.name());
    let ratings = base_ratings(roster, predictor);
    let scale = if model.value_scale > 0.0 {
        model.value_scale
    } else {
        1.0
    };
    stamina.map(Metric::Evpm, |player, s| {
        let rating = ratings.get(player).copied().unwrap_or(0.0);
        (rating / scale) * s
    })
}
