pub mod pressing;
pub mod substitution;

use serde::{Deserialize, Serialize};

use crate::roster::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FutureOutlook {
    pub value: f64,
    pub risk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionCandidate {
    pub out_player: PlayerId,
    pub in_player: PlayerId,
    pub delta_value: f64,
    pub delta_risk: f64,
    pub score: f64,
    pub out_risk: f64,
}
