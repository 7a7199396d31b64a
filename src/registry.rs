//! Builds the read-only character table from the two raw role lists, the night
//! sheet and the merged overrides.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::character::{normalize_id, Character, NightAction, RoleType, NOT_FOUND};
use crate::night_order::{night_sequences, NightOrder, NightSequences, Phase, DEMON_INFO, MINION_INFO};
use crate::overrides::{HomebrewMeta, OverrideTable};

/// Primary role list entry: the source of truth for identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRole {
    pub id: String,
    pub name: String,
    pub role_type: String,
}

/// Secondary role list entry: ability and night reminder text.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineRole {
    pub id: String,
    #[serde(default)]
    pub ability: Option<String>,
    #[serde(default)]
    pub first_night_reminder: String,
    #[serde(default)]
    pub other_night_reminder: String,
}

/// Non-fatal problems found while building the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnknownRoleType { id: String, role_type: String },
    MissingDetails { id: String },
    MissingNightOrder { id: String, phase: Phase },
}

const MINION_INFO_TEXT: &str = "If there are 7 or more players, wake all Minions. \
     Show the THIS IS THE DEMON token and point to the Demon. \
     Show the THESE ARE YOUR MINIONS token and point to the other Minions.";

const DEMON_INFO_TEXT: &str = "If there are 7 or more players, wake the Demon. \
     Show the THESE ARE YOUR MINIONS token and point to all Minions. \
     Show the THESE CHARACTERS ARE NOT IN PLAY token and three not-in-play good characters.";

#[derive(Debug, Clone)]
pub struct Registry {
    characters: BTreeMap<String, Character>,
    minion_info: Character,
    demon_info: Character,
    diagnostics: Vec<Diagnostic>,
}

fn info_character(key: &str, name: &str, role_type: RoleType, text: &str, night_order: &NightOrder) -> Character {
    Character {
        id: key.to_string(),
        name: name.to_string(),
        role_type,
        ability: None,
        first_night: Some(NightAction {
            text: text.to_string(),
            order: night_order.order_or_warn(Phase::FirstNight, key),
        }),
        other_nights: None,
    }
}

/// Text for the other-nights action when the override table has no
/// other-nights entry of its own: a first-night override applies to both
/// phases.
fn other_nights_override<'a>(overrides: &'a OverrideTable, id: &str) -> Option<&'a str> {
    overrides
        .other_nights(id)
        .or_else(|| overrides.first_night(id))
}

struct Builder<'a> {
    night_order: &'a NightOrder,
    overrides: &'a OverrideTable,
    diagnostics: Vec<Diagnostic>,
}

impl Builder<'_> {
    fn night_action(
        &mut self,
        id: &str,
        name: &str,
        role_type: RoleType,
        phase: Phase,
        raw_text: &str,
        override_text: Option<&str>,
    ) -> Option<NightAction> {
        if raw_text.trim().is_empty() {
            return None;
        }
        let order = self.order_or_report(id, role_type, phase, self.night_order.index_in(phase, name));
        Some(NightAction {
            text: override_text.unwrap_or(raw_text).to_string(),
            order,
        })
    }

    /// `order`, or [`NOT_FOUND`] with a warning and a diagnostic when it is
    /// missing. Travelers wake outside the sheet and are not reported.
    fn order_or_report(&mut self, id: &str, role_type: RoleType, phase: Phase, order: Option<i32>) -> i32 {
        order.unwrap_or_else(|| {
            if role_type != RoleType::Traveler {
                warn!(id, %phase, "character missing from night order");
                self.diagnostics.push(Diagnostic::MissingNightOrder {
                    id: id.to_string(),
                    phase,
                });
            }
            NOT_FOUND
        })
    }

    /// A character that exists only as an override carrying a homebrew block.
    /// Its night positions come from the block, not the night sheet.
    fn homebrew_character(&mut self, id: &str, meta: &HomebrewMeta) -> Character {
        let overrides = self.overrides;
        let first_night = overrides.first_night(id).map(|text| NightAction {
            text: text.to_string(),
            order: self.order_or_report(id, meta.role_type, Phase::FirstNight, meta.first_night_index),
        });
        let other_nights = other_nights_override(overrides, id).map(|text| NightAction {
            text: text.to_string(),
            order: self.order_or_report(id, meta.role_type, Phase::OtherNights, meta.other_nights_index),
        });
        Character {
            id: id.to_string(),
            name: meta.name.clone(),
            role_type: meta.role_type,
            ability: overrides.ability(id).map(str::to_string),
            first_night,
            other_nights,
        }
    }

    fn character(&mut self, role: &ScriptRole, role_type: RoleType, details: &OnlineRole) -> Character {
        let overrides = self.overrides;
        let id = normalize_id(&role.id);
        let ability = overrides
            .ability(&id)
            .map(str::to_string)
            .or_else(|| details.ability.clone());
        let first_night = self.night_action(
            &id,
            &role.name,
            role_type,
            Phase::FirstNight,
            &details.first_night_reminder,
            overrides.first_night(&id),
        );
        let other_nights = self.night_action(
            &id,
            &role.name,
            role_type,
            Phase::OtherNights,
            &details.other_night_reminder,
            other_nights_override(overrides, &id),
        );
        Character {
            id,
            name: role.name.clone(),
            role_type,
            ability,
            first_night,
            other_nights,
        }
    }
}

/// Build the registry. Problems in the input data are logged and collected in
/// [`Registry::diagnostics`]; they never abort the build.
pub fn build_registry(
    script_roles: &[ScriptRole],
    online_roles: &[OnlineRole],
    night_order: &NightOrder,
    overrides: &OverrideTable,
) -> Registry {
    let online: HashMap<String, &OnlineRole> = online_roles
        .iter()
        .map(|role| (normalize_id(&role.id), role))
        .collect();

    let mut builder = Builder {
        night_order,
        overrides,
        diagnostics: Vec::new(),
    };
    let mut characters = BTreeMap::new();

    for role in script_roles {
        let id = normalize_id(&role.id);
        let Some(role_type) = RoleType::from_str_or_shorthand(&role.role_type) else {
            warn!(id = %id, role_type = %role.role_type, "skipping character with unknown role type");
            builder.diagnostics.push(Diagnostic::UnknownRoleType {
                id,
                role_type: role.role_type.clone(),
            });
            continue;
        };
        let Some(details) = online.get(&id) else {
            warn!(id = %id, "skipping character without ability details");
            builder.diagnostics.push(Diagnostic::MissingDetails { id });
            continue;
        };
        let character = builder.character(role, role_type, details);
        characters.insert(character.id.clone(), character);
    }

    for id in online.keys().filter(|id| !characters.contains_key(*id)) {
        debug!(id = %id, "ignoring retired or renamed character");
    }

    for (id, entry) in overrides.iter() {
        let Some(meta) = entry.homebrew.as_ref() else {
            continue;
        };
        if characters.contains_key(id) {
            continue;
        }
        let character = builder.homebrew_character(id, meta);
        characters.insert(character.id.clone(), character);
    }

    Registry {
        characters,
        minion_info: info_character(MINION_INFO, "Minion Info", RoleType::Minion, MINION_INFO_TEXT, night_order),
        demon_info: info_character(DEMON_INFO, "Demon Info", RoleType::Demon, DEMON_INFO_TEXT, night_order),
        diagnostics: builder.diagnostics,
    }
}

impl Registry {
    pub fn get(&self, id: &str) -> Option<&Character> {
        self.characters.get(id)
    }

    /// Look up by display name or any spelling that normalizes to the same id.
    pub fn find_by_name(&self, name: &str) -> Option<&Character> {
        self.characters.get(&normalize_id(name))
    }

    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn minion_info(&self) -> &Character {
        &self.minion_info
    }

    pub fn demon_info(&self) -> &Character {
        &self.demon_info
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// First-night and other-nights sequences for a script's characters,
    /// including the Minion/Demon info beats.
    pub fn night_sequences<'a>(&'a self, characters: &'a [Character]) -> NightSequences<'a> {
        night_sequences([&self.minion_info, &self.demon_info], characters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::night_order::{NightSheet, DAWN, DUSK};
    use crate::overrides::{merge_overrides, Override, OverrideLayer, OverrideSource};

    fn script_role(id: &str, name: &str, role_type: &str) -> ScriptRole {
        ScriptRole {
            id: id.to_string(),
            name: name.to_string(),
            role_type: role_type.to_string(),
        }
    }

    fn online_role(id: &str, first: &str, other: &str) -> OnlineRole {
        OnlineRole {
            id: id.to_string(),
            ability: Some(format!("{} ability", id)),
            first_night_reminder: first.to_string(),
            other_night_reminder: other.to_string(),
        }
    }

    fn night_order() -> NightOrder {
        NightOrder::new(&NightSheet {
            first_night: [DUSK, MINION_INFO, DEMON_INFO, "Poisoner", "Fortune Teller", DAWN]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            other_nights: [DUSK, "Poisoner", "Imp", "Fortune Teller", DAWN]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })
    }

    fn fixture(overrides: &OverrideTable) -> Registry {
        let script = vec![
            script_role("fortune_teller", "Fortune Teller", "townsfolk"),
            script_role("poisoner", "Poisoner", "minion"),
            script_role("imp", "Imp", "demon"),
            script_role("soldier", "Soldier", "townsfolk"),
            script_role("wizard", "Wizard", "wizard"),
            script_role("scapegoat", "Scapegoat", "traveler"),
            script_role("empath", "Empath", "townsfolk"),
        ];
        let online = vec![
            online_role("fortuneteller", "Choose 2 players.", "Choose 2 players."),
            online_role("poisoner", "Poison a player.", "Poison a player."),
            online_role("imp", "", "Kill a player."),
            online_role("soldier", "", ""),
            online_role("scapegoat", "Scapegoat wakes.", ""),
            online_role("retired", "Gone.", ""),
        ];
        build_registry(&script, &online, &night_order(), overrides)
    }

    #[test]
    fn test_ids_are_normalized() {
        let registry = fixture(&OverrideTable::default());
        let teller = registry.get("fortuneteller").unwrap();
        assert_eq!(teller.name, "Fortune Teller");
        assert_eq!(teller.role_type, RoleType::Townsfolk);
        assert_eq!(registry.find_by_name("Fortune Teller").unwrap().id, "fortuneteller");
    }

    #[test]
    fn test_night_actions_use_sheet_positions() {
        let registry = fixture(&OverrideTable::default());
        let teller = registry.get("fortuneteller").unwrap();
        assert_eq!(teller.first_night.as_ref().unwrap().order, 4);
        assert_eq!(teller.other_nights.as_ref().unwrap().order, 3);

        let imp = registry.get("imp").unwrap();
        assert!(imp.first_night.is_none());
        assert_eq!(imp.other_nights.as_ref().unwrap().order, 2);

        let soldier = registry.get("soldier").unwrap();
        assert!(soldier.first_night.is_none());
        assert!(soldier.other_nights.is_none());
    }

    #[test]
    fn test_bad_records_become_diagnostics() {
        let registry = fixture(&OverrideTable::default());
        assert!(registry.get("wizard").is_none());
        assert!(registry.get("empath").is_none());
        assert!(registry.get("retired").is_none());
        assert!(registry.diagnostics().contains(&Diagnostic::UnknownRoleType {
            id: "wizard".to_string(),
            role_type: "wizard".to_string(),
        }));
        assert!(registry.diagnostics().contains(&Diagnostic::MissingDetails {
            id: "empath".to_string(),
        }));
    }

    #[test]
    fn test_travelers_missing_from_sheet_are_not_reported() {
        let registry = fixture(&OverrideTable::default());
        let scapegoat = registry.get("scapegoat").unwrap();
        assert_eq!(scapegoat.first_night.as_ref().unwrap().order, NOT_FOUND);
        assert!(!registry
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::MissingNightOrder { id, .. } if id == "scapegoat")));
    }

    #[test]
    fn test_override_text_wins() {
        let layer = OverrideLayer::new(OverrideSource::BaseGame)
            .with(
                "poisoner",
                Override {
                    ability: Some("Poison someone.".to_string()),
                    first_night: Some("Poison, first night.".to_string()),
                    ..Default::default()
                },
            )
            .with(
                "fortuneteller",
                Override {
                    nights: Some("Point at two players.".to_string()),
                    ..Default::default()
                },
            );
        let registry = fixture(&merge_overrides(vec![layer]));

        let poisoner = registry.get("poisoner").unwrap();
        assert_eq!(poisoner.ability.as_deref(), Some("Poison someone."));
        assert_eq!(poisoner.first_night.as_ref().unwrap().text, "Poison, first night.");
        // A first-night override with no other-nights override covers both phases.
        assert_eq!(poisoner.other_nights.as_ref().unwrap().text, "Poison, first night.");

        let teller = registry.get("fortuneteller").unwrap();
        assert_eq!(teller.first_night.as_ref().unwrap().text, "Point at two players.");
        assert_eq!(teller.other_nights.as_ref().unwrap().text, "Point at two players.");
        assert_eq!(teller.ability.as_deref(), Some("fortuneteller ability"));
    }

    #[test]
    fn test_homebrew_characters_are_added() {
        let layer = OverrideLayer::new(OverrideSource::HomebrewPacks).with(
            "piebaker",
            Override {
                ability: Some("Bake.".to_string()),
                other_nights: Some("The Pie Baker bakes.".to_string()),
                homebrew: Some(HomebrewMeta {
                    name: "Pie Baker".to_string(),
                    role_type: RoleType::Townsfolk,
                    first_night_index: None,
                    other_nights_index: Some(2),
                }),
                ..Default::default()
            },
        );
        let registry = fixture(&merge_overrides(vec![layer]));
        let baker = registry.get("piebaker").unwrap();
        assert_eq!(baker.name, "Pie Baker");
        assert!(baker.first_night.is_none());
        assert_eq!(baker.other_nights.as_ref().unwrap().order, 2);
    }

    #[test]
    fn test_homebrew_character_without_index_is_reported() {
        let meta = |name: &str, role_type| HomebrewMeta {
            name: name.to_string(),
            role_type,
            first_night_index: None,
            other_nights_index: None,
        };
        let layer = OverrideLayer::new(OverrideSource::DynamicHomebrew)
            .with(
                "piebaker",
                Override {
                    other_nights: Some("The Pie Baker bakes.".to_string()),
                    homebrew: Some(meta("Pie Baker", RoleType::Townsfolk)),
                    ..Default::default()
                },
            )
            .with(
                "pilgrim",
                Override {
                    first_night: Some("The Pilgrim arrives.".to_string()),
                    homebrew: Some(meta("Pilgrim", RoleType::Traveler)),
                    ..Default::default()
                },
            );
        let registry = fixture(&merge_overrides(vec![layer]));

        let baker = registry.get("piebaker").unwrap();
        assert_eq!(baker.other_nights.as_ref().unwrap().order, NOT_FOUND);
        assert!(registry.diagnostics().contains(&Diagnostic::MissingNightOrder {
            id: "piebaker".to_string(),
            phase: Phase::OtherNights,
        }));

        let pilgrim = registry.get("pilgrim").unwrap();
        assert_eq!(pilgrim.first_night.as_ref().unwrap().order, NOT_FOUND);
        assert!(!registry
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::MissingNightOrder { id, .. } if id == "pilgrim")));
    }

    #[test]
    fn test_homebrew_override_of_known_character_is_not_reported() {
        let layer = OverrideLayer::new(OverrideSource::DynamicHomebrew).with(
            "imp",
            Override {
                other_nights: Some("The homebrew Imp kills.".to_string()),
                homebrew: Some(HomebrewMeta {
                    name: "Imp".to_string(),
                    role_type: RoleType::Demon,
                    first_night_index: None,
                    other_nights_index: None,
                }),
                ..Default::default()
            },
        );
        let registry = fixture(&merge_overrides(vec![layer]));
        let imp = registry.get("imp").unwrap();
        assert_eq!(imp.other_nights.as_ref().unwrap().order, 2);
        assert_eq!(imp.other_nights.as_ref().unwrap().text, "The homebrew Imp kills.");
        assert!(!registry
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::MissingNightOrder { .. })));
    }

    #[test]
    fn test_synthetic_info_entries() {
        let registry = fixture(&OverrideTable::default());
        assert_eq!(registry.minion_info().first_night.as_ref().unwrap().order, 1);
        assert_eq!(registry.demon_info().first_night.as_ref().unwrap().order, 2);

        let sequences = registry.night_sequences(&[]);
        let ids: Vec<&str> = sequences.first_night.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![MINION_INFO, DEMON_INFO]);
    }
}
