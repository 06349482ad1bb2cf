use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::models::fatigue::run_fatigue_model;
use crate::models::hazard::run_hazard_model;
use crate::models::value::run_value_model;
use crate::models::{TimeSeries, MINUTES};
use crate::optimizer::pressing::decide_pressing;
use crate::optimizer::substitution::{optimize_substitution, rank_substitutions};
use crate::rating::RatingPredictor;
use crate::roster::Roster;
use crate::types::{Advice, MatchState, Recommendation, SubstitutionRecommendation, TimelineRow};

#[derive(Debug, Clone)]
pub struct MatchCurves {
    pub stamina: TimeSeries,
    pub hazard: TimeSeries,
    pub value: TimeSeries,
}

#[derive(Clone)]
pub struct Advisor {
    model: ModelConfig,
    predictor: Arc<dyn RatingPredictor>,
}

impl Advisor {
    pub fn new(model: ModelConfig, predictor: Arc<dyn RatingPredictor>) -> Self {
        Self { model, predictor }
    }

    pub fn predictor_name(&self) -> &str {
        self.predictor.name()
    }

    pub fn curves(&self, state: &MatchState, roster: &Roster) -> MatchCurves {
        let stamina = run_fatigue_model(state, roster, &self.model);
        let hazard = run_hazard_model(&stamina, &self.model);
        let value = run_value_model(roster, &stamina, self.predictor.as_ref(), &self.model);
        MatchCurves {
            stamina,
            hazard,
            value,
        }
    }

    pub fn recommend(&self, state: &MatchState, roster: &Roster) -> Advice {
        info!(
            "recommendation request: minute={} wbgt={} altitude={} risk_aversion={}",
            state.minute, state.wbgt, state.altitude_m, state.risk_aversion
        );
        let curves = self.curves(state, roster);
        let substitution = optimize_substitution(state, roster, &curves.value, &curves.hazard);
        let pressing = decide_pressing(state, roster, &curves.stamina);
        let timeline = build_timeline(roster, &curves);

        if let (Some(out), Some(sub)) = (&substitution.out_player, &substitution.in_player) {
            info!(
                "best substitution: {out} -> {sub} (score {:.5}), pressing {}",
                substitution.score, pressing.level
            );
        } else {
            info!("no substitution available, pressing {}", pressing.level);
        }

        Advice {
            recommendation: Recommendation {
                match_state: *state,
                substitution,
                pressing,
                rating_source: self.predictor.name().to_string(),
                generated_at: Utc::now(),
            },
            timeline,
        }
    }

    pub fn timeline(&self, state: &MatchState, roster: &Roster) -> Vec<TimelineRow> {
        debug!(
            "timeline request: minute={} wbgt={} altitude={}",
            state.minute, state.wbgt, state.altitude_m
        );
        build_timeline(roster, &self.curves(state, roster))
    }

    pub fn candidates(
        &self,
        state: &MatchState,
        roster: &Roster,
        top: usize,
    ) -> Vec<SubstitutionRecommendation> {
        let curves = self.curves(state, roster);
        rank_substitutions(state, roster, &curves.value, &curves.hazard, top)
    }
}

pub fn build_timeline(roster: &Roster, curves: &MatchCurves) -> Vec<TimelineRow> {
    let mut rows = Vec::with_capacity(roster.len() * MINUTES);
    for entry in roster.all() {
        for minute in 0..MINUTES as u32 {
            rows.push(TimelineRow {
                minute,
                player_id: entry.id.clone(),
                stamina: curves.stamina.at(&entry.id, minute).unwrap_or(0.0),
                injury_hazard: curves.hazard.at(&entry.id, minute).unwrap_or(0.0),
                evpm: curves.value.at(&entry.id, minute).unwrap_or(0.0),
            });
        }
    }
    rows
}
