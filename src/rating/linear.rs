use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::rating::RatingPredictor;
use crate::roster::PlayerAttributes;

/// Linear regression over the attribute vector with a one-hot position term.
///
/// Positions absent from `position_offsets` encode as all zeros, so a label
/// the model never saw contributes nothing rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRatingModel {
    #[serde(default = "default_name")]
    pub name: String,
    pub intercept: f64,
    #[serde(default)]
    pub age: f64,
    pub pace: f64,
    pub shooting: f64,
    pub passing: f64,
    pub dribbling: f64,
    pub defending: f64,
    pub physicality: f64,
    #[serde(default)]
    pub position_offsets: BTreeMap<String, f64>,
}

impl LinearRatingModel {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed reading rating model: {}", path.display()))?;
        let model: Self = serde_json::from_str(&data)
            .with_context(|| format!("invalid rating model JSON: {}", path.display()))?;
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        let coefficients = [
            self.intercept,
            self.age,
            self.pace,
            self.shooting,
            self.passing,
            self.dribbling,
            self.defending,
            self.physicality,
        ];
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(anyhow!("rating model {} has non-finite coefficients", self.name));
        }
        if let Some((label, _)) = self.position_offsets.iter().find(|(_, v)| !v.is_finite()) {
            return Err(anyhow!("rating model {} has non-finite offset for {label}", self.name));
        }
        Ok(())
    }

    fn position_offset(&self, attributes: &PlayerAttributes) -> f64 {
        let label = attributes.position.label();
        self.position_offsets
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(label))
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }
}

impl RatingPredictor for LinearRatingModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, attributes: &PlayerAttributes) -> f64 {
        let raw = self.intercept
            + self.age * f64::from(attributes.age)
            + self.pace * attributes.pace
            + self.shooting * attributes.shooting
            + self.passing * attributes.passing
            + self.dribbling * attributes.dribbling
            + self.defending * attributes.defending
            + self.physicality * attributes.physicality
            + self.position_offset(attributes);
        raw.clamp(0.0, 100.0)
    }
}

fn default_name() -> String {
    "linear".to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::LinearRatingModel;
    use crate::rating::RatingPredictor;
    use crate::roster::tests::attrs;
    use crate::roster::Position;

    fn overall_weights() -> LinearRatingModel {
        serde_json::from_value(json!({
            "name": "overall_v1",
            "intercept": 0.0,
            "pace": 0.15,
            "shooting": 0.15,
            "passing": 0.2,
            "dribbling": 0.2,
            "defending": 0.15,
            "physicality": 0.15,
            "position_offsets": { "Forward": 2.0, "goalkeeper": -3.0 }
        }))
        .expect("model JSON")
    }

    #[test]
    fn predicts_weighted_sum_with_position_offset() {
        let model = overall_weights();
        let base = 80.0 * 0.15 + 70.0 * 0.15 + 75.0 * 0.2 + 78.0 * 0.2 + 60.0 * 0.15 + 75.0 * 0.15;
        let forward = model.predict(&attrs(Position::Forward, 75.0));
        assert!((forward - (base + 2.0)).abs() < 1e-9);
        let keeper = model.predict(&attrs(Position::Goalkeeper, 75.0));
        assert!((keeper - (base - 3.0)).abs() < 1e-9);
    }

    #[test]
    fn unseen_position_uses_default_encoding() {
        let model = overall_weights();
        let midfielder = model.predict(&attrs(Position::Midfielder, 75.0));
        let unknown = model.predict(&attrs(Position::Other("Libero".to_string()), 75.0));
        assert_eq!(midfielder, unknown);
    }

    #[test]
    fn rejects_non_finite_coefficients() {
        let mut model = overall_weights();
        model.pace = f64::INFINITY;
        assert!(model.validate().is_err());
    }

    #[test]
    fn ratings_are_clamped_to_the_0_100_scale() {
        let mut model = overall_weights();
        model.intercept = 500.0;
        assert_eq!(model.predict(&attrs(Position::Midfielder, 75.0)), 100.0);

        model.intercept = -500.0;
        assert_eq!(model.predict(&attrs(Position::Midfielder, 75.0)), 0.0);
    }
}
