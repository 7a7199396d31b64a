//! Global first-night and other-nights orders, and sorting a script's
//! characters into the two sequences a storyteller follows.

use std::fmt;

use serde::Deserialize;
use tracing::warn;

use crate::character::{normalize_id, Character, NightAction, NOT_FOUND};

pub const DUSK: &str = "DUSK";
pub const DAWN: &str = "DAWN";
pub const MINION_INFO: &str = "MINION";
pub const DEMON_INFO: &str = "DEMON";

/// Fixed beats of the night sheet. They are matched literally, never normalized.
const SENTINELS: [&str; 4] = [DUSK, DAWN, MINION_INFO, DEMON_INFO];

/// Not on the sheet; wakes before everything else on the first night.
const FIRST_BEFORE_ALL: &str = "bootlegger";

/// Wakes in place of the Demon info beat on the first night.
const FIRST_AT_DEMON_INFO: &str = "lordoftyphon";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    FirstNight,
    OtherNights,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::FirstNight => write!(f, "first night"),
            Phase::OtherNights => write!(f, "other nights"),
        }
    }
}

/// The canonical night sheet as display names, in game order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightSheet {
    pub first_night: Vec<String>,
    pub other_nights: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NightOrder {
    first_night: Vec<String>,
    other_nights: Vec<String>,
}

fn sheet_key(entry: &str) -> String {
    if SENTINELS.contains(&entry) {
        entry.to_string()
    } else {
        normalize_id(entry)
    }
}

fn position(list: &[String], key: &str) -> Option<i32> {
    list.iter()
        .position(|entry| entry == key)
        .and_then(|index| i32::try_from(index).ok())
}

impl NightOrder {
    pub fn new(sheet: &NightSheet) -> Self {
        NightOrder {
            first_night: sheet.first_night.iter().map(|e| sheet_key(e)).collect(),
            other_nights: sheet.other_nights.iter().map(|e| sheet_key(e)).collect(),
        }
    }

    /// Normalized first-night sequence (sentinels untouched).
    pub fn first_night(&self) -> &[String] {
        &self.first_night
    }

    pub fn other_nights(&self) -> &[String] {
        &self.other_nights
    }

    /// Position of `name` on the first night, or `None` when it is not on the
    /// sheet. Position 0 is a real position.
    pub fn index_in_first_night(&self, name: &str) -> Option<i32> {
        let key = sheet_key(name);
        match key.as_str() {
            FIRST_BEFORE_ALL => Some(NOT_FOUND),
            FIRST_AT_DEMON_INFO => position(&self.first_night, DEMON_INFO),
            _ => position(&self.first_night, &key),
        }
    }

    pub fn index_in_other_nights(&self, name: &str) -> Option<i32> {
        position(&self.other_nights, &sheet_key(name))
    }

    pub fn index_in(&self, phase: Phase, name: &str) -> Option<i32> {
        match phase {
            Phase::FirstNight => self.index_in_first_night(name),
            Phase::OtherNights => self.index_in_other_nights(name),
        }
    }

    /// Like [`NightOrder::index_in`], but logs a miss and returns [`NOT_FOUND`].
    pub fn order_or_warn(&self, phase: Phase, name: &str) -> i32 {
        self.index_in(phase, name).unwrap_or_else(|| {
            warn!(character = name, %phase, "character missing from night order");
            NOT_FOUND
        })
    }
}

/// A script's characters in the order they wake.
#[derive(Debug, Clone)]
pub struct NightSequences<'a> {
    pub first_night: Vec<&'a Character>,
    pub other_nights: Vec<&'a Character>,
}

fn action(character: &Character, phase: Phase) -> Option<&NightAction> {
    match phase {
        Phase::FirstNight => character.first_night.as_ref(),
        Phase::OtherNights => character.other_nights.as_ref(),
    }
}

/// Sort key. A character without an action for the phase counts as position 0,
/// the same as the first sheet entry; only acting characters reach the sort.
fn sort_key(character: &Character, phase: Phase) -> i32 {
    action(character, phase).map_or(0, |a| a.order)
}

fn sequence<'a>(seed: &[&'a Character], characters: &'a [Character], phase: Phase) -> Vec<&'a Character> {
    let mut steps: Vec<&'a Character> = seed
        .iter()
        .copied()
        .chain(characters.iter())
        .filter(|c| action(c, phase).is_some())
        .collect();
    // Stable: ties keep seed-then-script order.
    steps.sort_by_key(|c| sort_key(c, phase));
    steps
}

/// Build both night sequences for a script. `seed` holds the synthetic
/// Minion/Demon info entries, which come before the script's own characters
/// when positions tie.
pub fn night_sequences<'a>(seed: [&'a Character; 2], characters: &'a [Character]) -> NightSequences<'a> {
    NightSequences {
        first_night: sequence(&seed, characters, Phase::FirstNight),
        other_nights: sequence(&seed, characters, Phase::OtherNights),
    }
}
