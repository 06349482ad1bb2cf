use crate::roster::{PlayerAttributes, Position, Roster, RosterEntry};

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    position: Position,
    age: u32,
    pace: f64,
    shooting: f64,
    passing: f64,
    dribbling: f64,
    defending: f64,
    physicality: f64,
) -> RosterEntry {
    RosterEntry::new(
        id,
        PlayerAttributes {
            position,
            age,
            pace,
            shooting,
            passing,
            dribbling,
            defending,
            physicality,
        },
    )
}

impl Roster {
    pub fn sample() -> Self {
        let pitch = vec![
            entry("P1_Adams", Position::Midfielder, 24, 88.0, 65.0, 75.0, 78.0, 82.0, 85.0),
            entry("P2_Pulisic", Position::Forward, 25, 92.0, 82.0, 80.0, 88.0, 45.0, 70.0),
            entry("P3_Reyna", Position::Midfielder, 21, 85.0, 80.0, 84.0, 86.0, 40.0, 68.0),
            entry("P4_Dest", Position::Defender, 23, 91.0, 60.0, 75.0, 82.0, 78.0, 72.0),
            entry("P5_Richards", Position::Defender, 24, 82.0, 40.0, 60.0, 65.0, 85.0, 88.0),
        ];
        let bench = vec![
            entry("P16_Aaronson", Position::Midfielder, 23, 89.0, 74.0, 78.0, 84.0, 50.0, 70.0),
            entry("P17_Weah", Position::Forward, 24, 94.0, 78.0, 72.0, 83.0, 40.0, 75.0),
            entry("P18_Robinson", Position::Defender, 26, 93.0, 50.0, 68.0, 75.0, 80.0, 84.0),
        ];
        Self { pitch, bench }
    }
}
