use tracing::{debug, warn};

use crate::models::TimeSeries;
use crate::optimizer::{FutureOutlook, SubstitutionCandidate};
use crate::roster::{PlayerId, Roster, RosterEntry};
use crate::types::{MatchState, SubstitutionRecommendation};

pub fn future_outlooks(
    entries: &[RosterEntry],
    value: &TimeSeries,
    hazard: &TimeSeries,
    from_minute: u32,
) -> Vec<(PlayerId, FutureOutlook)> {
    entries
        .iter()
        .map(|entry| {
            let outlook = FutureOutlook {
                value: value.sum_from(&entry.id, from_minute),
                risk: hazard.sum_from(&entry.id, from_minute),
            };
            (entry.id.clone(), outlook)
        })
        .collect()
}

/// Every (out, in) pair, pitch-major then bench, in roster order.
pub fn score_candidates(
    pitch: &[(PlayerId, FutureOutlook)],
    bench: &[(PlayerId, FutureOutlook)],
    risk_aversion: f64,
) -> Vec<SubstitutionCandidate> {
    let mut candidates = Vec::with_capacity(pitch.len() * bench.len());
    for (out_player, current) in pitch {
        for (in_player, sub) in bench {
            let delta_value = sub.value - current.value;
            let delta_risk = sub.risk - current.risk;
            candidates.push(SubstitutionCandidate {
                out_player: out_player.clone(),
                in_player: in_player.clone(),
                delta_value,
                delta_risk,
                score: delta_value - risk_aversion * delta_risk,
                out_risk: current.risk,
            });
        }
    }
    candidates
}

/// First pair reaching the maximum score wins.
pub fn choose_substitution(
    pitch: &[(PlayerId, FutureOutlook)],
    bench: &[(PlayerId, FutureOutlook)],
    risk_aversion: f64,
    at_minute: u32,
) -> SubstitutionRecommendation {
    let mut best: Option<SubstitutionCandidate> = None;
    for candidate in score_candidates(pitch, bench, risk_aversion) {
        let improves = match &best {
            Some(current) => candidate.score > current.score,
            None => !candidate.score.is_nan(),
        };
        if improves {
            best = Some(candidate);
        }
    }
    match best {
        Some(candidate) => to_recommendation(candidate, at_minute),
        None => {
            debug!("no substitution candidates at minute {at_minute}");
            SubstitutionRecommendation::none(at_minute)
        }
    }
}

pub fn optimize_substitution(
    state: &MatchState,
    roster: &Roster,
    value: &TimeSeries,
    hazard: &TimeSeries,
) -> SubstitutionRecommendation {
    let pitch = future_outlooks(roster.pitch(), value, hazard, state.minute);
    let bench = future_outlooks(roster.bench(), value, hazard, state.minute);
    debug!(
        "comparing {} x {} substitution pairs from minute {}",
        pitch.len(),
        bench.len(),
        state.minute
    );
    choose_substitution(&pitch, &bench, state.risk_aversion, state.minute)
}

/// Best `top` pairs by score. Ties keep roster order, so the head matches
/// [`optimize_substitution`].
pub fn rank_substitutions(
    state: &MatchState,
    roster: &Roster,
    value: &TimeSeries,
    hazard: &TimeSeries,
    top: usize,
) -> Vec<SubstitutionRecommendation> {
    let pitch = future_outlooks(roster.pitch(), value, hazard, state.minute);
    let bench = future_outlooks(roster.bench(), value, hazard, state.minute);
    let mut candidates = score_candidates(&pitch, &bench, state.risk_aversion);
    candidates.retain(|c| !c.score.is_nan());
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
        .into_iter()
        .take(top)
        .map(|c| to_recommendation(c, state.minute))
        .collect()
}

pub fn risk_percent(delta_risk: f64, out_risk: f64) -> f64 {
    if out_risk == 0.0 || !out_risk.is_finite() {
        warn!("replaced player has zero future risk, reporting 0% risk change");
        return 0.0;
    }
    delta_risk / out_risk * 100.0
}

fn to_recommendation(candidate: SubstitutionCandidate, at_minute: u32) -> SubstitutionRecommendation {
    SubstitutionRecommendation {
        delta_risk_percent: risk_percent(candidate.delta_risk, candidate.out_risk),
        out_player: Some(candidate.out_player),
        in_player: Some(candidate.in_player),
        at_minute,
        score: candidate.score,
        delta_value: candidate.delta_value,
        delta_risk: candidate.delta_risk,
    }
}
