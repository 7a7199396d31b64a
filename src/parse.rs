//! Textual bag syntax: `{washerwoman chef, imp}`.
//!
//! Names are separated by whitespace or commas and matched against a script's
//! characters by id or display name. Unknown names come back with suggestions.

use crate::bag::Selection;
use crate::character::{normalize_id, Character};
use crate::error::{Error, Result};

const SUGGESTION_THRESHOLD: f64 = 0.7;
const CONFIDENT_THRESHOLD: f64 = 0.85;
const MAX_SUGGESTIONS: usize = 3;

/// Parse `{name name ...}` into a selection of ids from `script`.
pub fn parse_bag(input: &str, script: &[Character]) -> Result<Selection> {
    let trimmed = input.trim();
    let Some(content) = trimmed.strip_prefix('{').and_then(|s| s.strip_suffix('}')) else {
        return Err(Error::UnbracedBag(input.to_string()));
    };

    content
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| match_character_name(token, script).map(|c| c.id.clone()))
        .collect()
}

/// Find the character `name` refers to. Exact ids (including numbered copies
/// like `villageidiot-1`) match first, then normalized ids and display names.
pub fn match_character_name<'a>(name: &str, script: &'a [Character]) -> Result<&'a Character> {
    let lowered = name.to_lowercase();
    if let Some(character) = script.iter().find(|c| c.id == lowered) {
        return Ok(character);
    }

    let key = normalize_id(name);
    if let Some(character) = script
        .iter()
        .find(|c| c.id == c.base_id() && (c.id == key || normalize_id(&c.name) == key))
    {
        return Ok(character);
    }

    Err(Error::UnknownCharacter {
        name: name.to_string(),
        suggestions: suggestions(&key, script),
    })
}

fn suggestions(key: &str, script: &[Character]) -> Vec<String> {
    let mut scored: Vec<(&str, f64)> = script
        .iter()
        .filter(|c| c.id == c.base_id())
        .map(|c| (c.id.as_str(), strsim::jaro_winkler(key, &c.id)))
        .filter(|(_, similarity)| *similarity >= SUGGESTION_THRESHOLD)
        .collect();
    scored.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    match scored.first() {
        Some((closest, similarity)) if *similarity >= CONFIDENT_THRESHOLD => vec![closest.to_string()],
        _ => scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(id, _)| id.to_string())
            .collect(),
    }
}
