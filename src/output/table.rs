use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::roster::{Roster, Squad};
use crate::types::{PressingLevel, Recommendation, SubstitutionRecommendation, TimelineRow};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn render_recommendation_table(recommendation: &Recommendation) -> String {
    let sub = &recommendation.substitution;
    let state = &recommendation.match_state;
    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);

    table.add_row(vec![
        "Match state".to_string(),
        format!(
            "minute {} | WBGT {:.1}C | altitude {:.0}m | risk aversion {:.2}",
            state.minute, state.wbgt, state.altitude_m, state.risk_aversion
        ),
    ]);
    if sub.is_none() {
        table.add_row(vec!["Substitution".to_string(), "No Sub".to_string()]);
    } else {
        table.add_row(vec![
            "Substitution".to_string(),
            format!(
                "{} off, {} on at {}'",
                sub.out_player.as_deref().unwrap_or("-"),
                sub.in_player.as_deref().unwrap_or("-"),
                sub.at_minute
            ),
        ]);
    }
    table.add_row(vec![
        "Value change".to_string(),
        format!("{:+.4}", sub.delta_value),
    ]);
    table.add_row(vec![
        "Risk change".to_string(),
        format!("{:+.1}%", sub.delta_risk_percent),
    ]);

    let level_color = match recommendation.pressing.level {
        PressingLevel::High => Color::Green,
        PressingLevel::Medium => Color::Yellow,
        PressingLevel::Low => Color::Red,
    };
    table.add_row(Row::from(vec![
        Cell::new("Pressing"),
        Cell::new(format!(
            "{} ({})",
            recommendation.pressing.level, recommendation.pressing.rationale
        ))
        .fg(level_color),
    ]));
    table.add_row(vec![
        "Rating source".to_string(),
        recommendation.rating_source.clone(),
    ]);
    table.to_string()
}

pub fn render_candidates_table(candidates: &[SubstitutionRecommendation]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Rank",
        "Off",
        "On",
        "Score",
        "Value change",
        "Risk change",
    ]);
    for (idx, candidate) in candidates.iter().enumerate() {
        let risk_cell = if candidate.delta_risk_percent <= 0.0 {
            Cell::new(format!("{:+.1}%", candidate.delta_risk_percent)).fg(Color::Green)
        } else {
            Cell::new(format!("{:+.1}%", candidate.delta_risk_percent)).fg(Color::Red)
        };
        table.add_row(Row::from(vec![
            Cell::new((idx + 1).to_string()),
            Cell::new(candidate.out_player.as_deref().unwrap_or("-")),
            Cell::new(candidate.in_player.as_deref().unwrap_or("-")),
            Cell::new(format!("{:.5}", candidate.score)),
            Cell::new(format!("{:+.4}", candidate.delta_value)),
            risk_cell,
        ]));
    }
    table.to_string()
}

pub fn render_timeline_table(rows: &[TimelineRow]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Minute", "Player", "Stamina", "Injury hazard", "EVPM"]);
    for row in rows {
        table.add_row(vec![
            row.minute.to_string(),
            row.player_id.clone(),
            format!("{:.3}", row.stamina),
            format!("{:.6}", row.injury_hazard),
            format!("{:.5}", row.evpm),
        ]);
    }
    table.to_string()
}

pub fn render_roster_table(roster: &Roster) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Player",
        "Squad",
        "Position",
        "Age",
        "PAC",
        "SHO",
        "PAS",
        "DRI",
        "DEF",
        "PHY",
    ]);
    for entry in roster.all() {
        let squad = match roster.squad_of(&entry.id) {
            Some(Squad::Pitch) => "pitch",
            Some(Squad::Bench) => "bench",
            None => "-",
        };
        let a = &entry.attributes;
        table.add_row(vec![
            entry.id.clone(),
            squad.to_string(),
            a.position.to_string(),
            a.age.to_string(),
            format!("{:.0}", a.pace),
            format!("{:.0}", a.shooting),
            format!("{:.0}", a.passing),
            format!("{:.0}", a.dribbling),
            format!("{:.0}", a.defending),
            format!("{:.0}", a.physicality),
        ]);
    }
    table.to_string()
}
