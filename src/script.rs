//! Scripts: named lists of character ids that a game draws from.

use serde_json::Value;
use tracing::warn;

use crate::character::{normalize_id, Character};
use crate::error::{Error, Result};
use crate::registry::Registry;

/// Characters a script may hold several copies of, and how many extra copies.
const DUPLICABLE: [(&str, u8); 2] = [("villageidiot", 2), ("legionary", 2)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub title: String,
    pub ids: Vec<String>,
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|id| id.to_string()).collect()
}

impl Script {
    pub fn new(title: impl Into<String>, ids: Vec<String>) -> Self {
        Script {
            title: title.into(),
            ids,
        }
    }

    pub fn trouble_brewing() -> Self {
        Script::new(
            "Trouble Brewing",
            ids(&[
                "washerwoman", "librarian", "investigator", "chef", "empath", "fortuneteller", "undertaker",
                "monk", "ravenkeeper", "virgin", "slayer", "soldier", "mayor", "butler", "drunk", "recluse",
                "saint", "poisoner", "spy", "scarletwoman", "baron", "imp",
            ]),
        )
    }

    /// Every bundled character, for trying out setup-modifying combinations.
    pub fn experimental() -> Self {
        Script::new(
            "Experimental",
            ids(&[
                // townsfolk
                "washerwoman", "librarian", "investigator", "chef", "empath", "fortuneteller", "undertaker",
                "monk", "ravenkeeper", "virgin", "slayer", "soldier", "mayor", "balloonist", "huntsman",
                "choirboy", "king", "villageidiot", "atheist", "actor", "legionary",
                // outsiders
                "butler", "drunk", "recluse", "saint", "hermit", "heretic", "damsel",
                // minions
                "poisoner", "spy", "scarletwoman", "baron", "godfather", "marionette", "xaan", "summoner", "ppp",
                // demons
                "imp", "fanggu", "vigormortis", "riot", "legion", "lilmonsta", "kazali", "lordoftyphon",
                "hannibal", "babygronk",
                // fabled and travellers
                "sentinel", "bootlegger", "scapegoat",
            ]),
        )
    }

    pub fn all() -> Vec<Script> {
        vec![Script::trouble_brewing(), Script::experimental()]
    }

    /// Look up a bundled script by name, ignoring case and separators.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .to_lowercase()
            .chars()
            .filter(|c| ![' ', '-', '_'].contains(c))
            .collect();
        match normalized.as_str() {
            "tb" | "troublebrewing" => Some(Script::trouble_brewing()),
            "exp" | "experimental" => Some(Script::experimental()),
            _ => None,
        }
    }

    /// Parse a script document: a JSON array of character ids, either bare
    /// strings or objects with an `id` field. An optional `{"id": "_meta"}`
    /// object supplies the title.
    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<Value> = serde_json::from_str(json)?;
        let mut title = None;
        let mut ids = Vec::with_capacity(items.len());

        for item in items {
            let id = match &item {
                Value::String(id) => id.as_str(),
                Value::Object(map) => map
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::MalformedEntry(item.to_string()))?,
                other => return Err(Error::MalformedEntry(other.to_string())),
            };
            let name = item.get("name").and_then(Value::as_str);
            if id == "_meta" {
                title = name.map(str::to_string);
                continue;
            }
            // Homebrew definitions are keyed by name, the way the homebrew layer keys them.
            match name {
                Some(name) if item.get("team").is_some() => ids.push(normalize_id(name)),
                _ => ids.push(normalize_id(id)),
            }
        }

        Ok(Script::new(title.unwrap_or_else(|| "Custom Script".to_string()), ids))
    }

    /// Resolve the script's ids against `registry`, in script order. Unknown ids
    /// are logged and skipped. Duplicable characters bring their numbered
    /// copies (`villageidiot-1`, ...) along.
    pub fn characters(&self, registry: &Registry) -> Vec<Character> {
        let mut characters = Vec::with_capacity(self.ids.len());
        for id in &self.ids {
            let Some(character) = registry.get(id).or_else(|| registry.find_by_name(id)) else {
                warn!(script = %self.title, id = %id, "script lists an unknown character");
                continue;
            };
            characters.push(character.clone());
        }

        let mut copies = Vec::new();
        for (base, count) in DUPLICABLE {
            let Some(original) = characters.iter().find(|c| c.id == base) else {
                continue;
            };
            for n in 1..=count {
                copies.push(Character {
                    id: format!("{}-{}", original.id, n),
                    name: format!("{} ({})", original.name, n + 1),
                    ..original.clone()
                });
            }
        }
        characters.extend(copies);
        characters
    }
}
