//! Randomized completion of partial selections, and demon bluffs.
//!
//! Every function takes its random source as a parameter so callers can seed
//! it.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::bag::{effective_distribution, Selection};
use crate::character::{Character, RoleType};
use crate::distribution::same_distribution;
use crate::setup::{modifying_characters, target_distributions};

/// Whole-search restarts before giving up.
pub const MAX_ATTEMPTS: usize = 5;

pub const BLUFF_COUNT: usize = 3;

/// Townsfolk whose absence the good team can already deduce.
const BLUFF_DENYLIST: [&str; 6] = ["atheist", "actor", "villageidiot", "legionary", "choirboy", "huntsman"];

/// Pick a random unselected character of `role_type`. Duplicate
/// pseudo-characters are never picked on their own.
fn pick_unselected<'a, R: Rng + ?Sized>(
    rng: &mut R,
    script: &'a [Character],
    selection: &Selection,
    role_type: RoleType,
) -> Option<&'a Character> {
    let candidates: Vec<&Character> = script
        .iter()
        .filter(|c| c.role_type == role_type && c.id == c.base_id() && !selection.contains(&c.id))
        .collect();
    candidates.choose(rng).copied()
}

/// One greedy random walk from `partial` towards a legal selection.
fn attempt_completion<R: Rng + ?Sized>(
    rng: &mut R,
    player_count: u8,
    script: &[Character],
    partial: &Selection,
) -> Option<Selection> {
    let mut selection = partial.clone();

    loop {
        let selected = selection.characters(script);
        let targets = target_distributions(player_count, &modifying_characters(&selected), script);
        let current = effective_distribution(script, &selection, player_count);

        if targets.iter().any(|t| same_distribution(t, &current)) {
            return Some(selection);
        }

        let role_type = if current.demon == 0 && targets.iter().any(|t| t.demon > 0) {
            RoleType::Demon
        } else if targets.iter().all(|t| current.minion < t.minion) {
            RoleType::Minion
        } else {
            let target = targets.choose(rng)?;
            if target.outsider > current.outsider {
                RoleType::Outsider
            } else if target.townsfolk > current.townsfolk {
                RoleType::Townsfolk
            } else {
                trace!(%current, %target, "selection is overfull");
                return None;
            }
        };

        let Some(character) = pick_unselected(rng, script, &selection, role_type) else {
            trace!(role_type = role_type.name(), "no unselected characters left");
            return None;
        };
        trace!(character = %character.id, "adding character");
        selection.insert(character.id.clone());
    }
}

/// Extend `partial` to a selection whose effective distribution is one of the
/// legal targets for `player_count`.
///
/// This is a randomized greedy search restarted up to [`MAX_ATTEMPTS`] times.
/// `None` means every attempt hit a dead end, not that no completion exists.
pub fn random_complete_selection<R: Rng + ?Sized>(
    rng: &mut R,
    player_count: u8,
    script: &[Character],
    partial: &Selection,
) -> Option<Selection> {
    partial.warn_unknown(script);
    for attempt in 1..=MAX_ATTEMPTS {
        if let Some(selection) = attempt_completion(rng, player_count, script, partial) {
            return Some(selection);
        }
        debug!(attempt, "random completion hit a dead end");
    }
    None
}

/// Fill up to [`BLUFF_COUNT`] bluffs with unselected Townsfolk, keeping the
/// `existing` ones. Returns fewer when the script runs out of candidates.
pub fn random_bluffs<R: Rng + ?Sized>(
    rng: &mut R,
    script: &[Character],
    selection: &Selection,
    existing: &Selection,
) -> Selection {
    let mut bluffs = existing.clone();
    let mut pool: Vec<&Character> = script
        .iter()
        .filter(|c| {
            c.role_type == RoleType::Townsfolk
                && c.id == c.base_id()
                && !BLUFF_DENYLIST.contains(&c.id.as_str())
                && !selection.contains(&c.id)
                && !bluffs.contains(&c.id)
        })
        .collect();

    while bluffs.len() < BLUFF_COUNT && !pool.is_empty() {
        let character = pool.swap_remove(rng.gen_range(0..pool.len()));
        bluffs.insert(character.id.clone());
    }
    bluffs
}
