//! Layered per-character patches on top of the bundled character data.
//!
//! Each layer is a flat map from character id to [`Override`]. Layers are folded
//! in [`OVERRIDE_PRECEDENCE`] order and a later layer replaces an earlier
//! layer's entry for the same id as a whole.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::character::{normalize_id, RoleType};
use crate::error::{Error, Result};

/// Where an override layer comes from. Variant order is merge order: later
/// sources win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverrideSource {
    /// Corrections to base-game text.
    BaseGame,
    /// Characters released after the bundled data was captured.
    NewRoles,
    /// Thematic variants of existing characters.
    ThemedVariants,
    /// Homebrew packs bundled with the tool.
    HomebrewPacks,
    /// Special-mode variants, e.g. memory-loss characters.
    SpecialModes,
    /// Crossover and themed packs.
    Crossover,
    /// Homebrew scripts supplied at runtime.
    DynamicHomebrew,
}

pub const OVERRIDE_PRECEDENCE: [OverrideSource; 7] = [
    OverrideSource::BaseGame,
    OverrideSource::NewRoles,
    OverrideSource::ThemedVariants,
    OverrideSource::HomebrewPacks,
    OverrideSource::SpecialModes,
    OverrideSource::Crossover,
    OverrideSource::DynamicHomebrew,
];

/// Identity of a character that only exists as an override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomebrewMeta {
    pub name: String,
    pub role_type: RoleType,
    #[serde(default)]
    pub first_night_index: Option<i32>,
    #[serde(default)]
    pub other_nights_index: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    #[serde(default)]
    pub ability: Option<String>,
    /// Same text for both phases; takes precedence over the per-phase fields.
    #[serde(default)]
    pub nights: Option<String>,
    #[serde(default)]
    pub first_night: Option<String>,
    #[serde(default)]
    pub other_nights: Option<String>,
    #[serde(default)]
    pub homebrew: Option<HomebrewMeta>,
}

#[derive(Debug, Clone)]
pub struct OverrideLayer {
    pub source: OverrideSource,
    pub entries: BTreeMap<String, Override>,
}

impl OverrideLayer {
    pub fn new(source: OverrideSource) -> Self {
        OverrideLayer {
            source,
            entries: BTreeMap::new(),
        }
    }

    pub fn with(mut self, id: &str, entry: Override) -> Self {
        self.entries.insert(id.to_string(), entry);
        self
    }
}

/// The merged result of all layers.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: BTreeMap<String, Override>,
}

/// Fold `layers` into one table. Layers are ordered by their source first, so the
/// precedence does not depend on the order the caller collected them in; layers
/// from the same source keep their relative order.
pub fn merge_overrides(layers: impl IntoIterator<Item = OverrideLayer>) -> OverrideTable {
    let mut layers: Vec<OverrideLayer> = layers.into_iter().collect();
    layers.sort_by_key(|layer| layer.source);

    let mut entries = BTreeMap::new();
    for layer in layers {
        for (id, entry) in layer.entries {
            if entries.insert(id.clone(), entry).is_some() {
                debug!(id = %id, source = ?layer.source, "override replaced by later layer");
            }
        }
    }
    OverrideTable { entries }
}

impl OverrideTable {
    pub fn get(&self, id: &str) -> Option<&Override> {
        self.entries.get(id)
    }

    pub fn ability(&self, id: &str) -> Option<&str> {
        self.get(id)?.ability.as_deref()
    }

    pub fn first_night(&self, id: &str) -> Option<&str> {
        let entry = self.get(id)?;
        entry.nights.as_deref().or(entry.first_night.as_deref())
    }

    pub fn other_nights(&self, id: &str) -> Option<&str> {
        let entry = self.get(id)?;
        entry.nights.as_deref().or(entry.other_nights.as_deref())
    }

    /// Explicit night positions for a character that is absent from the
    /// canonical night sheet.
    pub fn homebrew(&self, id: &str) -> Option<&HomebrewMeta> {
        self.get(id)?.homebrew.as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Override)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HomebrewEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    ability: Option<String>,
    #[serde(default)]
    first_night: Option<i32>,
    #[serde(default)]
    other_night: Option<i32>,
    #[serde(default)]
    first_night_reminder: Option<String>,
    #[serde(default)]
    other_night_reminder: Option<String>,
}

/// Official characters appear in homebrew scripts as bare ids.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HomebrewItem {
    Id(String),
    Entry(HomebrewEntry),
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

fn positive(index: Option<i32>) -> Option<i32> {
    index.filter(|i| *i > 0)
}

/// Build the [`OverrideSource::DynamicHomebrew`] layer from homebrew script JSON
/// documents. Every document is an array whose first element is the
/// `{"id": "_meta", ...}` entry; each following character object is keyed by its
/// normalized display name.
pub fn homebrew_layer<S: AsRef<str>>(scripts: &[S]) -> Result<OverrideLayer> {
    let mut layer = OverrideLayer::new(OverrideSource::DynamicHomebrew);

    for script in scripts {
        let items: Vec<HomebrewItem> = serde_json::from_str(script.as_ref())?;
        let mut items = items.into_iter();

        match items.next() {
            Some(HomebrewItem::Entry(HomebrewEntry { id: Some(id), .. })) if id == "_meta" => {}
            _ => return Err(Error::MissingMeta),
        }

        for item in items {
            let entry = match item {
                HomebrewItem::Entry(entry) if entry.team.is_some() => entry,
                other => {
                    debug!(item = ?other, "skipping reference to an official character");
                    continue;
                }
            };
            let name = entry
                .name
                .or(entry.id)
                .ok_or_else(|| Error::MalformedEntry("homebrew character without a name".to_string()))?;
            let team = entry.team.unwrap_or_default();
            let role_type = RoleType::from_str_or_shorthand(&team).ok_or_else(|| Error::UnknownTeam {
                name: name.clone(),
                team: team.clone(),
            })?;

            let id = normalize_id(&name);
            let homebrew = HomebrewMeta {
                name,
                role_type,
                first_night_index: positive(entry.first_night),
                other_nights_index: positive(entry.other_night),
            };
            layer.entries.insert(
                id,
                Override {
                    ability: non_empty(entry.ability),
                    nights: None,
                    first_night: non_empty(entry.first_night_reminder),
                    other_nights: non_empty(entry.other_night_reminder),
                    homebrew: Some(homebrew),
                },
            );
        }
    }

    Ok(layer)
}
