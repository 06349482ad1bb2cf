use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::roster::{PlayerAttributes, Position, Roster, RosterEntry, RosterError};

const ID_KEYS: [&str; 3] = ["id", "player_id", "name"];

pub fn load_roster_file(path: &Path) -> Result<Roster> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading roster: {}", path.display()))?;
    let value: Value = serde_json::from_str(&data)
        .with_context(|| format!("invalid roster JSON: {}", path.display()))?;
    let roster = parse_roster(&value)
        .with_context(|| format!("invalid roster file: {}", path.display()))?;
    Ok(roster)
}

/// Reads `{ "pitch": [...], "bench": [...] }` where each entry is a flat
/// record carrying an id and the eight player attributes.
pub fn parse_roster(value: &Value) -> Result<Roster, RosterError> {
    let pitch = parse_squad(value, "pitch")?;
    let bench = parse_squad(value, "bench")?;
    Roster::new(pitch, bench)
}

fn parse_squad(value: &Value, key: &str) -> Result<Vec<RosterEntry>, RosterError> {
    let Some(entries) = value
        .as_object()
        .and_then(|object| object_get_case_insensitive(object, key))
    else {
        return Err(RosterError::InvalidRecord {
            player: "<roster>".to_string(),
            field: key.to_string(),
        });
    };
    let Some(entries) = entries.as_array() else {
        return Err(RosterError::InvalidValue {
            player: "<roster>".to_string(),
            field: key.to_string(),
            value: entries.to_string(),
        });
    };

    let mut out = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let fallback_name = format!("{key}[{idx}]");
        let Some(object) = entry.as_object() else {
            return Err(RosterError::InvalidValue {
                player: fallback_name,
                field: "record".to_string(),
                value: entry.to_string(),
            });
        };
        out.push(parse_record(object, &fallback_name)?);
    }
    Ok(out)
}

pub fn parse_record(
    object: &Map<String, Value>,
    fallback_name: &str,
) -> Result<RosterEntry, RosterError> {
    let Some(id) = string_from_keys(object, &ID_KEYS) else {
        return Err(RosterError::InvalidRecord {
            player: fallback_name.to_string(),
            field: "id".to_string(),
        });
    };

    let position = match object_get_case_insensitive(object, "position") {
        Some(Value::String(label)) => {
            label
                .parse::<Position>()
                .map_err(|_| RosterError::InvalidValue {
                    player: id.clone(),
                    field: "position".to_string(),
                    value: label.clone(),
                })?
        }
        Some(other) => {
            return Err(RosterError::InvalidValue {
                player: id,
                field: "position".to_string(),
                value: other.to_string(),
            })
        }
        None => {
            return Err(RosterError::InvalidRecord {
                player: id,
                field: "position".to_string(),
            })
        }
    };

    let age = required_number(object, &id, "age")?;
    if !(0.0..=100.0).contains(&age) {
        return Err(RosterError::InvalidValue {
            player: id,
            field: "age".to_string(),
            value: age.to_string(),
        });
    }

    let mut skills = [0.0; 6];
    for (slot, field) in skills.iter_mut().zip(PlayerAttributes::SKILL_FIELDS) {
        let value = required_number(object, &id, field)?;
        if !(0.0..=100.0).contains(&value) {
            return Err(RosterError::InvalidValue {
                player: id,
                field: field.to_string(),
                value: value.to_string(),
            });
        }
        *slot = value;
    }
    let [pace, shooting, passing, dribbling, defending, physicality] = skills;

    Ok(RosterEntry {
        id,
        attributes: PlayerAttributes {
            position,
            age: age.round() as u32,
            pace,
            shooting,
            passing,
            dribbling,
            defending,
            physicality,
        },
    })
}

fn required_number(
    object: &Map<String, Value>,
    player: &str,
    field: &str,
) -> Result<f64, RosterError> {
    let Some(value) = object_get_case_insensitive(object, field) else {
        return Err(RosterError::InvalidRecord {
            player: player.to_string(),
            field: field.to_string(),
        });
    };
    to_f64(value).ok_or_else(|| RosterError::InvalidValue {
        player: player.to_string(),
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn string_from_keys(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        match object_get_case_insensitive(object, key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn object_get_case_insensitive<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).or_else(|| {
        object
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn to_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}
