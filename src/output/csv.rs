use anyhow::Result;

use crate::roster::{Roster, Squad};
use crate::types::{Recommendation, SubstitutionRecommendation, TimelineRow};

pub fn timeline_to_csv(rows: &[TimelineRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["minute", "player_id", "stamina", "injury_hazard", "evpm"])?;
    for row in rows {
        writer.write_record([
            row.minute.to_string(),
            row.player_id.clone(),
            format!("{:.6}", row.stamina),
            format!("{:.8}", row.injury_hazard),
            format!("{:.8}", row.evpm),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn candidates_to_csv(candidates: &[SubstitutionRecommendation]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "out_player",
        "in_player",
        "at_minute",
        "score",
        "delta_value",
        "delta_risk",
        "delta_risk_percent",
    ])?;
    for candidate in candidates {
        writer.write_record(substitution_fields(candidate))?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn recommendation_to_csv(recommendation: &Recommendation) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "out_player",
        "in_player",
        "at_minute",
        "score",
        "delta_value",
        "delta_risk",
        "delta_risk_percent",
        "pressing_level",
        "pressing_rationale",
    ])?;
    let mut fields = substitution_fields(&recommendation.substitution).to_vec();
    fields.push(recommendation.pressing.level.to_string());
    fields.push(recommendation.pressing.rationale.clone());
    writer.write_record(&fields)?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn roster_to_csv(roster: &Roster) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "squad",
        "position",
        "age",
        "pace",
        "shooting",
        "passing",
        "dribbling",
        "defending",
        "physicality",
    ])?;
    let squads = roster
        .pitch()
        .iter()
        .map(|entry| (Squad::Pitch, entry))
        .chain(roster.bench().iter().map(|entry| (Squad::Bench, entry)));
    for (squad, entry) in squads {
        let squad = match squad {
            Squad::Pitch => "pitch",
            Squad::Bench => "bench",
        };
        let a = &entry.attributes;
        let mut record = vec![
            entry.id.clone(),
            squad.to_string(),
            a.position.label().to_string(),
            a.age.to_string(),
        ];
        record.extend(a.skills().iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

fn substitution_fields(sub: &SubstitutionRecommendation) -> [String; 7] {
    [
        sub.out_player.clone().unwrap_or_default(),
        sub.in_player.clone().unwrap_or_default(),
        sub.at_minute.to_string(),
        format!("{:.6}", sub.score),
        format!("{:.6}", sub.delta_value),
        format!("{:.6}", sub.delta_risk),
        format!("{:.2}", sub.delta_risk_percent),
    ]
}

#[cfg(test)]
mod tests {
    use super::{roster_to_csv, timeline_to_csv};
    use crate::roster::Roster;
    use crate::types::TimelineRow;

    #[test]
    fn writes_header_and_one_line_per_row() {
        let rows = vec![
            TimelineRow {
                minute: 0,
                player_id: "P1_Adams".to_string(),
                stamina: 1.0,
                injury_hazard: 0.0001,
                evpm: 0.079,
            },
            TimelineRow {
                minute: 1,
                player_id: "P1_Adams".to_string(),
                stamina: 0.99,
                injury_hazard: 0.000102,
                evpm: 0.078,
            },
        ];
        let csv = timeline_to_csv(&rows).expect("csv renders");
        let lines = csv.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "minute,player_id,stamina,injury_hazard,evpm");
        assert!(lines[1].starts_with("0,P1_Adams,1.000000,"));
    }

    #[test]
    fn roster_lists_pitch_then_bench() {
        let csv = roster_to_csv(&Roster::sample()).expect("csv renders");
        let lines = csv.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].starts_with("id,squad,position,age,pace"));
        assert_eq!(lines[1], "P1_Adams,pitch,Midfielder,24,88,65,75,78,82,85");
        assert!(lines[6].starts_with("P16_Aaronson,bench,"));
    }
}
