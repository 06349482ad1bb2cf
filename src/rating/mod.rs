pub mod linear;

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::rating::linear::LinearRatingModel;
use crate::roster::PlayerAttributes;

/// Attribute vector in, overall rating on a roughly 0..100 scale out.
pub trait RatingPredictor: Send + Sync {
    fn name(&self) -> &str;
    fn predict(&self, attributes: &PlayerAttributes) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAttributeRating;

impl RatingPredictor for MeanAttributeRating {
    fn name(&self) -> &str {
        "mean_attributes"
    }

    fn predict(&self, attributes: &PlayerAttributes) -> f64 {
        attributes.mean_skill()
    }
}

/// Picks the predictor once at startup. A missing or unreadable model file
/// degrades to [`MeanAttributeRating`] instead of failing.
pub fn load_predictor(model_path: Option<&Path>) -> Arc<dyn RatingPredictor> {
    let Some(path) = model_path else {
        info!("no rating model configured, using mean-of-attributes rating");
        return Arc::new(MeanAttributeRating);
    };
    match LinearRatingModel::load(path) {
        Ok(model) => {
            info!("loaded rating model {} from {}", model.name(), path.display());
            Arc::new(model)
        }
        Err(err) => {
            warn!("rating model unavailable ({err:#}), using mean-of-attributes rating");
            Arc::new(MeanAttributeRating)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{load_predictor, MeanAttributeRating, RatingPredictor};
    use crate::roster::tests::attrs;
    use crate::roster::Position;

    #[test]
    fn fallback_is_mean_of_skills() {
        let a = attrs(Position::Forward, 75.0);
        assert!((MeanAttributeRating.predict(&a) - a.mean_skill()).abs() < 1e-12);
    }

    #[test]
    fn missing_model_file_falls_back() {
        let predictor = load_predictor(Some(Path::new("/nonexistent/player_model.json")));
        assert_eq!(predictor.name(), "mean_attributes");
        let predictor = load_predictor(None);
        assert_eq!(predictor.name(), "mean_attributes");
    }
}
