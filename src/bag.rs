//! Selections, the split of a selection into bag and outside-bag characters,
//! and validating a selection against the legal distributions.

use std::collections::BTreeSet;

use tracing::warn;

use crate::character::{Character, RoleType};
use crate::distribution::{same_distribution, Distribution};
use crate::setup::{modifying_characters, target_distributions, SetupModification, HERMIT};

const DRUNK: &str = "drunk";

/// Character ids chosen for a game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(BTreeSet<String>);

impl Selection {
    pub fn new() -> Self {
        Selection::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.0.remove(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The selected characters of `script`, in script order. Selected ids the
    /// script does not know are skipped.
    pub fn characters<'a>(&self, script: &'a [Character]) -> Vec<&'a Character> {
        script.iter().filter(|c| self.contains(&c.id)).collect()
    }

    /// Selected ids that are not on `script`.
    pub fn unknown_ids(&self, script: &[Character]) -> Vec<&str> {
        self.iter().filter(|id| !script.iter().any(|c| c.id == *id)).collect()
    }

    /// Log each selected id that is not on `script`.
    pub(crate) fn warn_unknown(&self, script: &[Character]) {
        for id in self.unknown_ids(script) {
            warn!(id, "selected character is not on the script");
        }
    }
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Selection(iter.into_iter().map(Into::into).collect())
    }
}

/// One token in the bag. Copies added for Riot, Legion and Actor carry an
/// instance number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BagEntry<'a> {
    pub character: &'a Character,
    pub instance: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BagSplit<'a> {
    pub bag: Vec<BagEntry<'a>>,
    pub outside_bag: Vec<&'a Character>,
}

/// Whether `character`'s own token goes in the bag.
pub fn occupies_bag_slot(character: &Character) -> bool {
    if character.role_type == RoleType::Fabled {
        return false;
    }
    SetupModification::for_character(character.base_id()).map_or(true, SetupModification::occupies_bag_slot)
}

/// Extra copies of `character` to add to a bag that already holds `bag_len`
/// tokens.
fn extra_copies(character: &Character, player_count: u8, bag_len: usize) -> usize {
    let base = Distribution::base_setup(player_count);
    let room = usize::from(player_count).saturating_sub(bag_len);
    match SetupModification::for_character(character.base_id()) {
        Some(SetupModification::Riot) => usize::try_from(base.minion).unwrap_or(0),
        Some(SetupModification::Legion | SetupModification::Actor) => {
            usize::try_from(base.townsfolk + base.outsider - 1).unwrap_or(0).min(room)
        }
        _ => 0,
    }
}

/// Split the selected characters of `script` into the bag and the characters
/// in play outside it.
pub fn split_selected_chars<'a>(script: &'a [Character], selection: &Selection, player_count: u8) -> BagSplit<'a> {
    let selected = selection.characters(script);

    let (in_bag, mut outside_bag): (Vec<&Character>, Vec<&Character>) =
        selected.iter().copied().partition(|c| occupies_bag_slot(c));

    let mut bag: Vec<BagEntry<'a>> = in_bag
        .iter()
        .map(|&character| BagEntry {
            character,
            instance: None,
        })
        .collect();

    for &character in &in_bag {
        let copies = extra_copies(character, player_count, bag.len());
        for instance in 0..copies {
            bag.push(BagEntry {
                character,
                instance: u8::try_from(instance).ok(),
            });
        }
    }

    let hermit_in_bag = bag.iter().any(|entry| entry.character.id == HERMIT);
    if hermit_in_bag && !selection.contains(DRUNK) {
        if let Some(drunk) = script.iter().find(|c| c.id == DRUNK) {
            outside_bag.push(drunk);
        }
    }

    outside_bag.sort_by(|a, b| a.name.cmp(&b.name));
    BagSplit { bag, outside_bag }
}

/// Distribution of the selected characters as chosen, without duplicates.
pub fn actual_distribution(script: &[Character], selection: &Selection) -> Distribution {
    Distribution::of_characters(selection.characters(script))
}

/// Distribution once Riot, Legion and Actor copies are counted.
pub fn effective_distribution(script: &[Character], selection: &Selection, player_count: u8) -> Distribution {
    let mut distribution = actual_distribution(script, selection);
    let split = split_selected_chars(script, selection, player_count);
    for entry in split.bag.iter().filter(|entry| entry.instance.is_some()) {
        distribution.add(entry.character.role_type, 1);
    }
    distribution
}

/// Outcome of checking a selection for a player count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupValidation {
    Valid { distribution: Distribution },
    /// The bag does not hold one token per player.
    WrongCount { expected: usize, actual: usize },
    /// The bag is full but matches none of the legal distributions.
    WrongDistribution {
        actual: Distribution,
        targets: Vec<Distribution>,
    },
}

fn difference(a: &Distribution, b: &Distribution) -> i32 {
    (a.townsfolk - b.townsfolk).abs()
        + (a.outsider - b.outsider).abs()
        + (a.minion - b.minion).abs()
        + (a.demon - b.demon).abs()
}

fn describe(problems: &mut Vec<String>, role_type: RoleType, expected: i32, actual: i32) {
    let diff = expected - actual;
    let plural = |n: i32| {
        if n != 1 && role_type != RoleType::Townsfolk {
            "s"
        } else {
            ""
        }
    };
    if diff > 0 {
        problems.push(format!("Missing {} {}{}", diff, role_type.name(), plural(diff)));
    } else if diff < 0 {
        problems.push(format!("{} too many {}{}", -diff, role_type.name(), plural(-diff)));
    }
}

impl SetupValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, SetupValidation::Valid { .. })
    }

    /// Human-readable list of what is wrong; empty when valid.
    pub fn problems(&self) -> Vec<String> {
        match self {
            SetupValidation::Valid { .. } => Vec::new(),
            SetupValidation::WrongCount { expected, actual } => {
                vec![format!("Bag holds {} characters but there are {} players", actual, expected)]
            }
            SetupValidation::WrongDistribution { actual, targets } => {
                let Some(closest) = targets.iter().min_by_key(|t| difference(t, actual)) else {
                    return Vec::new();
                };
                let mut problems = Vec::new();
                for role_type in RoleType::COUNTED {
                    describe(&mut problems, role_type, closest.get(role_type), actual.get(role_type));
                }
                problems
            }
        }
    }
}

/// Check `selection` against the legal distributions for `player_count`.
pub fn validate_selection(script: &[Character], selection: &Selection, player_count: u8) -> SetupValidation {
    selection.warn_unknown(script);
    let split = split_selected_chars(script, selection, player_count);
    if split.bag.len() != usize::from(player_count) {
        return SetupValidation::WrongCount {
            expected: usize::from(player_count),
            actual: split.bag.len(),
        };
    }

    let selected = selection.characters(script);
    let targets = target_distributions(player_count, &modifying_characters(&selected), script);
    let actual = effective_distribution(script, selection, player_count);
    if targets.iter().any(|t| same_distribution(t, &actual)) {
        SetupValidation::Valid { distribution: actual }
    } else {
        SetupValidation::WrongDistribution { actual, targets }
    }
}
