pub mod loader;
pub mod sample;

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type PlayerId = String;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    /// Label the rating model was never trained on. Kept verbatim.
    Other(String),
}

impl Position {
    pub fn label(&self) -> &str {
        match self {
            Self::Goalkeeper => "Goalkeeper",
            Self::Defender => "Defender",
            Self::Midfielder => "Midfielder",
            Self::Forward => "Forward",
            Self::Other(label) => label.as_str(),
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Error)]
#[error("empty position label")]
pub struct PositionParseError;

impl FromStr for Position {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let position = match normalized.as_str() {
            "" => return Err(PositionParseError),
            "goalkeeper" | "gk" | "keeper" => Self::Goalkeeper,
            "defender" | "def" | "df" => Self::Defender,
            "midfielder" | "mid" | "mf" => Self::Midfielder,
            "forward" | "fwd" | "fw" | "striker" => Self::Forward,
            _ => Self::Other(s.trim().to_string()),
        };
        Ok(position)
    }
}

impl From<String> for Position {
    fn from(value: String) -> Self {
        Position::from_str(&value).unwrap_or(Position::Other(value))
    }
}

impl From<Position> for String {
    fn from(value: Position) -> Self {
        value.label().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    pub position: Position,
    pub age: u32,
    pub pace: f64,
    pub shooting: f64,
    pub passing: f64,
    pub dribbling: f64,
    pub defending: f64,
    pub physicality: f64,
}

impl PlayerAttributes {
    pub const SKILL_FIELDS: [&'static str; 6] = [
        "pace",
        "shooting",
        "passing",
        "dribbling",
        "defending",
        "physicality",
    ];

    pub fn skills(&self) -> [f64; 6] {
        [
            self.pace,
            self.shooting,
            self.passing,
            self.dribbling,
            self.defending,
            self.physicality,
        ]
    }

    pub fn mean_skill(&self) -> f64 {
        let skills = self.skills();
        skills.iter().sum::<f64>() / skills.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: PlayerId,
    pub attributes: PlayerAttributes,
}

impl RosterEntry {
    pub fn new(id: impl Into<PlayerId>, attributes: PlayerAttributes) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Squad {
    Pitch,
    Bench,
}

#[derive(Debug, Error, PartialEq)]
pub enum RosterError {
    #[error("invalid roster record {player}: missing field `{field}`")]
    InvalidRecord { player: String, field: String },
    #[error("invalid roster record {player}: field `{field}` has invalid value {value}")]
    InvalidValue {
        player: String,
        field: String,
        value: String,
    },
    #[error("player {0} is listed on both pitch and bench")]
    OverlappingSets(String),
}

/// Players currently fielded and players available on the bench.
/// Both lists keep insertion order, which is the optimizer's iteration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roster {
    pitch: Vec<RosterEntry>,
    bench: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(pitch: Vec<RosterEntry>, bench: Vec<RosterEntry>) -> Result<Self, RosterError> {
        let mut seen = BTreeSet::new();
        for entry in pitch.iter().chain(bench.iter()) {
            if !seen.insert(entry.id.as_str()) {
                return Err(RosterError::OverlappingSets(entry.id.clone()));
            }
        }
        Ok(Self { pitch, bench })
    }

    pub fn pitch(&self) -> &[RosterEntry] {
        &self.pitch
    }

    pub fn bench(&self) -> &[RosterEntry] {
        &self.bench
    }

    pub fn all(&self) -> impl Iterator<Item = &RosterEntry> {
        self.pitch.iter().chain(self.bench.iter())
    }

    pub fn len(&self) -> usize {
        self.pitch.len() + self.bench.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn squad_of(&self, id: &str) -> Option<Squad> {
        if self.pitch.iter().any(|e| e.id == id) {
            Some(Squad::Pitch)
        } else if self.bench.iter().any(|e| e.id == id) {
            Some(Squad::Bench)
        } else {
            None
        }
    }

    pub fn get(&self, id: &str) -> Option<&RosterEntry> {
        self.all().find(|e| e.id == id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn attrs(position: Position, physicality: f64) -> PlayerAttributes {
        PlayerAttributes {
            position,
            age: 25,
            pace: 80.0,
            shooting: 70.0,
            passing: 75.0,
            dribbling: 78.0,
            defending: 60.0,
            physicality,
        }
    }

    #[test]
    fn rejects_player_on_both_sets() {
        let err = Roster::new(
            vec![RosterEntry::new("a", attrs(Position::Forward, 75.0))],
            vec![RosterEntry::new("a", attrs(Position::Forward, 75.0))],
        )
        .unwrap_err();
        assert_eq!(err, RosterError::OverlappingSets("a".to_string()));
    }

    #[test]
    fn keeps_insertion_order_and_squads() {
        let roster = Roster::new(
            vec![
                RosterEntry::new("z", attrs(Position::Defender, 80.0)),
                RosterEntry::new("a", attrs(Position::Midfielder, 70.0)),
            ],
            vec![RosterEntry::new("m", attrs(Position::Forward, 65.0))],
        )
        .expect("valid roster");
        let ids = roster.all().map(|e| e.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["z", "a", "m"]);
        assert_eq!(roster.squad_of("m"), Some(Squad::Bench));
        assert_eq!(roster.squad_of("z"), Some(Squad::Pitch));
        assert_eq!(roster.squad_of("nobody"), None);
    }

    #[test]
    fn parses_positions_with_aliases_and_unknown_labels() {
        assert_eq!("GK".parse::<Position>().unwrap(), Position::Goalkeeper);
        assert_eq!(" striker ".parse::<Position>().unwrap(), Position::Forward);
        assert_eq!(
            "Wingback".parse::<Position>().unwrap(),
            Position::Other("Wingback".to_string())
        );
        assert!("  ".parse::<Position>().is_err());
    }

    #[test]
    fn mean_skill_ignores_age() {
        let a = attrs(Position::Forward, 75.0);
        let expected = (80.0 + 70.0 + 75.0 + 78.0 + 60.0 + 75.0) / 6.0;
        assert!((a.mean_skill() - expected).abs() < 1e-12);
    }
}
