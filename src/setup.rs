//! Setup modifications and the set of distributions a selection may legally
//! have.
//!
//! Starting from [`Distribution::base_setup`], every selected character with a
//! [`SetupModification`] maps each candidate distribution to one or more new
//! candidates. Ambiguous abilities ("+1 or -1 Outsider") branch, so the result
//! is a set rather than a single distribution.

use tracing::trace;

use crate::character::{Character, RoleType};
use crate::distribution::Distribution;

/// Demons are bounded by this instead of the script's Demon count, since
/// Riot and Legion put many copies of one Demon in play.
pub const DEMON_LIMIT: i32 = 15;

/// Highest Outsider count generated by abilities that allow any number of
/// Outsiders.
const ARBITRARY_OUTSIDER_LIMIT: i32 = 5;

pub const HERMIT: &str = "hermit";

/// Its jinx with the Baron lets the Baron add only one Outsider.
pub const BARON_JINX: &str = "heretic";

const HERMIT_OUTSIDERS: &[i32] = &[0, -1];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupModification {
    /// One branch per delta, moving that many Townsfolk to Outsiders.
    OutsiderCount(&'static [i32]),
    /// Drunk and Marionette: an extra Townsfolk token stands in for them.
    Drunk,
    /// +2 Outsiders, or +1/+2 when [`BARON_JINX`] is on the script.
    Baron,
    /// Lil' Monsta: an extra Minion token stands in for the Demon.
    ExtraMinion,
    /// Huntsman and Haruspex: a Damsel-style Outsider must be possible.
    Companion,
    Choirboy,
    Riot,
    Legion,
    Atheist,
    Actor,
    Kazali,
    Xaan,
    Summoner,
    LordOfTyphon,
    Hermit,
    VillageIdiot,
    Legionary,
    Hannibal,
    /// One Minion becomes a Townsfolk.
    MinionPpp,
    /// Two Townsfolk become Minions.
    BabyGronk,
}

impl SetupModification {
    /// Static table of characters that change the setup, keyed by id.
    pub fn for_character(id: &str) -> Option<SetupModification> {
        use SetupModification::*;
        let modification = match id {
            "baron" => Baron,
            "godfather" => OutsiderCount(&[-1, 1]),
            "fanggu" => OutsiderCount(&[1]),
            "vigormortis" => OutsiderCount(&[-1]),
            "balloonist" => OutsiderCount(&[0, 1]),
            "sentinel" => OutsiderCount(&[-1, 0, 1]),
            "drunk" | "marionette" => Drunk,
            "lilmonsta" => ExtraMinion,
            "huntsman" | "haruspex" => Companion,
            "choirboy" => Choirboy,
            "riot" => Riot,
            "legion" => Legion,
            "atheist" => Atheist,
            "actor" => Actor,
            "kazali" => Kazali,
            "xaan" => Xaan,
            "summoner" => Summoner,
            "lordoftyphon" => LordOfTyphon,
            "hermit" => Hermit,
            "villageidiot" => VillageIdiot,
            "legionary" => Legionary,
            "hannibal" => Hannibal,
            "ppp" => MinionPpp,
            "babygronk" => BabyGronk,
            _ => return None,
        };
        Some(modification)
    }

    /// Whether the character's own token goes in the bag.
    pub const fn occupies_bag_slot(self) -> bool {
        !matches!(
            self,
            SetupModification::Drunk | SetupModification::ExtraMinion | SetupModification::Hannibal
        )
    }
}

fn outsider_count(dist: Distribution, deltas: &[i32]) -> Vec<Distribution> {
    deltas
        .iter()
        .map(|delta| Distribution {
            townsfolk: dist.townsfolk - delta,
            outsider: dist.outsider + delta,
            ..dist
        })
        .collect()
}

/// Every split of the good players with 0 to [`ARBITRARY_OUTSIDER_LIMIT`] Outsiders.
fn arbitrary_outsiders(dist: Distribution) -> Vec<Distribution> {
    let good = dist.townsfolk + dist.outsider;
    (0..=ARBITRARY_OUTSIDER_LIMIT)
        .map(|outsider| Distribution {
            townsfolk: good - outsider,
            outsider,
            ..dist
        })
        .collect()
}

fn minions_to_townsfolk(dist: Distribution) -> Distribution {
    Distribution {
        townsfolk: dist.townsfolk + dist.minion,
        minion: 0,
        ..dist
    }
}

/// Apply one character's modification to one candidate distribution.
///
/// `script` is the full character list of the script; `selected` are the
/// currently selected characters, which the Hermit needs to inherit the
/// modifications of the other selected Outsiders.
pub fn apply_modification(
    dist: Distribution,
    modification: SetupModification,
    script: &[Character],
    selected: &[&Character],
) -> Vec<Distribution> {
    use SetupModification::*;
    match modification {
        OutsiderCount(deltas) => outsider_count(dist, deltas),
        Drunk => vec![Distribution {
            townsfolk: dist.townsfolk + 1,
            ..dist
        }],
        Baron => {
            if script.iter().any(|c| c.id == BARON_JINX) {
                outsider_count(dist, &[1, 2])
            } else {
                outsider_count(dist, &[2])
            }
        }
        ExtraMinion => vec![Distribution {
            minion: dist.minion + 1,
            ..dist
        }],
        Companion => {
            let with_outsider = Distribution {
                townsfolk: dist.townsfolk - 1,
                outsider: dist.outsider + 1,
                ..dist
            };
            if dist.outsider == 0 {
                vec![with_outsider]
            } else {
                vec![dist, with_outsider]
            }
        }
        Choirboy | VillageIdiot | Legionary => vec![dist],
        Riot => vec![Distribution {
            minion: 0,
            demon: dist.demon + dist.minion,
            ..dist
        }],
        Legion => {
            let total = dist.total();
            let good = total - dist.demon;
            let mut dists = Vec::new();
            for demon in [good, good - 1] {
                let good = total - demon;
                for townsfolk in 1..=good {
                    dists.push(Distribution::new(townsfolk, good - townsfolk, 0, demon));
                }
            }
            dists
        }
        Atheist => {
            let total = dist.total();
            (0..=ARBITRARY_OUTSIDER_LIMIT)
                .map(|outsider| Distribution::new(total - outsider, outsider, 0, 0))
                .collect()
        }
        Actor => vec![Distribution {
            townsfolk: dist.townsfolk + dist.outsider,
            outsider: 0,
            ..dist
        }],
        // Minions are always converted; which of them exist is not selectable here.
        Kazali | LordOfTyphon => arbitrary_outsiders(minions_to_townsfolk(dist)),
        Xaan => arbitrary_outsiders(dist),
        Summoner => vec![Distribution {
            townsfolk: dist.townsfolk + dist.demon,
            demon: 0,
            ..dist
        }],
        Hermit => {
            let mut dists = outsider_count(dist, HERMIT_OUTSIDERS);
            let inherited = selected
                .iter()
                .filter(|c| c.role_type == RoleType::Outsider && c.base_id() != HERMIT)
                .filter_map(|c| SetupModification::for_character(c.base_id()));
            for modification in inherited {
                dists = dists
                    .into_iter()
                    .flat_map(|d| apply_modification(d, modification, script, selected))
                    .collect();
            }
            dists
        }
        Hannibal => vec![Distribution {
            townsfolk: dist.townsfolk + 1,
            ..dist
        }],
        MinionPpp => vec![Distribution {
            townsfolk: dist.townsfolk + 1,
            minion: dist.minion - 1,
            ..dist
        }],
        BabyGronk => vec![Distribution {
            townsfolk: dist.townsfolk - 2,
            minion: dist.minion + 2,
            ..dist
        }],
    }
}

/// The characters among `selected` that modify the setup.
pub fn modifying_characters<'a>(selected: &[&'a Character]) -> Vec<&'a Character> {
    selected
        .iter()
        .copied()
        .filter(|c| SetupModification::for_character(c.base_id()).is_some())
        .collect()
}

/// All distributions a selection containing `modifying` may legally have.
///
/// Never empty: when every candidate falls outside what the script can supply,
/// the base distribution is returned on its own.
pub fn target_distributions(player_count: u8, modifying: &[&Character], script: &[Character]) -> Vec<Distribution> {
    let base = Distribution::base_setup(player_count);

    let mut ordered: Vec<&Character> = modifying.to_vec();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));

    let mut dists = vec![base];
    for character in &ordered {
        let Some(modification) = SetupModification::for_character(character.base_id()) else {
            continue;
        };
        dists = dists
            .into_iter()
            .flat_map(|d| apply_modification(d, modification, script, modifying))
            .collect();
        trace!(character = %character.id, candidates = dists.len(), "applied setup modification");
    }

    // The Hermit keeps its own modification even after removing itself from
    // the bag, so it applies whenever the script has one.
    if script.iter().any(|c| c.id == HERMIT) {
        dists = dists
            .into_iter()
            .flat_map(|d| outsider_count(d, HERMIT_OUTSIDERS))
            .collect();
    }

    let available = Distribution::of_characters(script);
    let mut targets: Vec<Distribution> = Vec::new();
    for dist in dists {
        let in_range = (0..=available.townsfolk).contains(&dist.townsfolk)
            && (0..=available.outsider).contains(&dist.outsider)
            && (0..=available.minion).contains(&dist.minion)
            && (0..=DEMON_LIMIT).contains(&dist.demon);
        if in_range && !targets.contains(&dist) {
            targets.push(dist);
        }
    }

    if targets.is_empty() {
        vec![base]
    } else {
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use crate::distribution::base_distribution;
    use crate::script::Script;

    fn characters(ids: &[&str]) -> Vec<Character> {
        let registry = builtin::registry();
        ids.iter()
            .map(|id| registry.get(id).cloned().unwrap_or_else(|| panic!("no character {}", id)))
            .collect()
    }

    fn trouble_brewing() -> Vec<Character> {
        Script::trouble_brewing().characters(&builtin::registry())
    }

    fn trouble_brewing_with(extra: &[&str]) -> Vec<Character> {
        let mut script = trouble_brewing();
        script.extend(characters(extra));
        script
    }

    fn pick<'a>(script: &'a [Character], ids: &[&str]) -> Vec<&'a Character> {
        ids.iter()
            .map(|id| script.iter().find(|c| c.id == *id).unwrap())
            .collect()
    }

    fn sorted(mut dists: Vec<Distribution>) -> Vec<Distribution> {
        dists.sort();
        dists
    }

    #[test]
    fn test_no_modifiers_gives_base() {
        let script = trouble_brewing();
        for n in 5..=15 {
            assert_eq!(target_distributions(n, &[], &script), vec![base_distribution(n)]);
        }
        assert_eq!(target_distributions(7, &[], &script), vec![Distribution::new(5, 0, 1, 1)]);
    }

    #[test]
    fn test_baron_adds_two_outsiders() {
        let script = trouble_brewing();
        let baron = pick(&script, &["baron"]);
        assert_eq!(target_distributions(7, &baron, &script), vec![Distribution::new(3, 2, 1, 1)]);
    }

    #[test]
    fn test_modifiers_apply_in_name_order() {
        // Actor before Baron: 5/1 -> 6/0 -> 4/2. The other way round the Baron's
        // Outsiders would be merged away.
        let script = trouble_brewing_with(&["actor"]);
        let expected = vec![Distribution::new(4, 2, 1, 1)];
        assert_eq!(target_distributions(8, &pick(&script, &["baron", "actor"]), &script), expected);
        assert_eq!(target_distributions(8, &pick(&script, &["actor", "baron"]), &script), expected);
        assert_ne!(
            apply_modification(Distribution::new(3, 3, 1, 1), SetupModification::Actor, &script, &[]),
            expected
        );
    }

    #[test]
    fn test_baron_jinxed_by_heretic() {
        let script = characters(&[
            "washerwoman", "chef", "empath", "monk", "butler", "saint", "recluse", "baron",
            "heretic", "imp",
        ]);
        let dists = apply_modification(base_distribution(7), SetupModification::Baron, &script, &[]);
        assert_eq!(dists, vec![Distribution::new(4, 1, 1, 1), Distribution::new(3, 2, 1, 1)]);
    }

    #[test]
    fn test_choirboy_is_noop() {
        let script = trouble_brewing();
        for n in 5..=15 {
            let base = base_distribution(n);
            assert_eq!(apply_modification(base, SetupModification::Choirboy, &script, &[]), vec![base]);
        }
    }

    #[test]
    fn test_godfather_branches() {
        let script = trouble_brewing_with(&["godfather"]);
        let selected = pick(&script, &["godfather"]);
        assert_eq!(
            sorted(target_distributions(8, &selected, &script)),
            vec![Distribution::new(4, 2, 1, 1), Distribution::new(6, 0, 1, 1)]
        );
    }

    #[test]
    fn test_out_of_range_branches_are_filtered() {
        // Only one outsider on the script: Godfather's +1 at 8 players needs two.
        let script = characters(&[
            "washerwoman", "chef", "empath", "monk", "investigator", "librarian", "butler",
            "godfather", "imp",
        ]);
        let selected = pick(&script, &["godfather"]);
        assert_eq!(target_distributions(8, &selected, &script), vec![Distribution::new(6, 0, 1, 1)]);
    }

    #[test]
    fn test_empty_result_falls_back_to_base() {
        // No outsiders at all, but Baron demands two.
        let script = characters(&["washerwoman", "chef", "empath", "monk", "investigator", "baron", "imp"]);
        let selected = pick(&script, &["baron"]);
        assert_eq!(target_distributions(7, &selected, &script), vec![base_distribution(7)]);
    }

    #[test]
    fn test_hermit_alone() {
        let script = characters(&[
            "washerwoman", "chef", "empath", "monk", "investigator", "librarian", "hermit",
            "saint", "poisoner", "imp",
        ]);
        let selected = pick(&script, &["hermit"]);
        assert_eq!(
            sorted(target_distributions(8, &selected, &script)),
            vec![Distribution::new(5, 1, 1, 1), Distribution::new(6, 0, 1, 1)]
        );
        // At 7 players there are no base Outsiders to remove.
        assert_eq!(target_distributions(7, &selected, &script), vec![Distribution::new(5, 0, 1, 1)]);
    }

    #[test]
    fn test_hermit_with_fang_gu() {
        let script = characters(&[
            "washerwoman", "chef", "empath", "monk", "investigator", "librarian", "hermit",
            "saint", "butler", "poisoner", "fanggu",
        ]);
        let selected = pick(&script, &["hermit", "fanggu"]);
        assert_eq!(
            sorted(target_distributions(8, &selected, &script)),
            vec![
                Distribution::new(4, 2, 1, 1),
                Distribution::new(5, 1, 1, 1),
                Distribution::new(6, 0, 1, 1),
            ]
        );
    }

    #[test]
    fn test_hermit_inherits_selected_outsiders() {
        let script = characters(&["washerwoman", "chef", "hermit", "drunk", "saint", "poisoner", "imp"]);
        let selected = pick(&script, &["hermit", "drunk"]);
        let dists = apply_modification(base_distribution(8), SetupModification::Hermit, &script, &selected);
        // Hermit's own 0/-1 branches, each with the Drunk's extra Townsfolk.
        assert_eq!(dists, vec![Distribution::new(6, 1, 1, 1), Distribution::new(7, 0, 1, 1)]);
    }

    #[test]
    fn test_hermit_on_script_applies_even_when_unselected() {
        let script = characters(&[
            "washerwoman", "chef", "empath", "monk", "investigator", "librarian", "hermit",
            "saint", "poisoner", "imp",
        ]);
        assert_eq!(
            sorted(target_distributions(8, &[], &script)),
            vec![Distribution::new(5, 1, 1, 1), Distribution::new(6, 0, 1, 1)]
        );
    }

    #[test]
    fn test_riot_turns_minions_into_demons() {
        let dists = apply_modification(base_distribution(10), SetupModification::Riot, &[], &[]);
        assert_eq!(dists, vec![Distribution::new(7, 0, 0, 3)]);
    }

    #[test]
    fn test_legion_branches() {
        let dists = apply_modification(base_distribution(7), SetupModification::Legion, &[], &[]);
        assert_eq!(
            dists,
            vec![
                Distribution::new(1, 0, 0, 6),
                Distribution::new(1, 1, 0, 5),
                Distribution::new(2, 0, 0, 5),
            ]
        );
    }

    #[test]
    fn test_atheist_removes_evil() {
        let dists = apply_modification(base_distribution(7), SetupModification::Atheist, &[], &[]);
        assert_eq!(dists.len(), 6);
        for (outsider, dist) in dists.iter().enumerate() {
            assert_eq!(*dist, Distribution::new(7 - outsider as i32, outsider as i32, 0, 0));
        }
    }

    #[test]
    fn test_actor_merges_good_players() {
        let dists = apply_modification(base_distribution(9), SetupModification::Actor, &[], &[]);
        assert_eq!(dists, vec![Distribution::new(7, 0, 1, 1)]);
    }

    #[test]
    fn test_companion_forces_outsider_when_none() {
        let forced = apply_modification(base_distribution(7), SetupModification::Companion, &[], &[]);
        assert_eq!(forced, vec![Distribution::new(4, 1, 1, 1)]);

        let optional = apply_modification(base_distribution(8), SetupModification::Companion, &[], &[]);
        assert_eq!(optional, vec![Distribution::new(5, 1, 1, 1), Distribution::new(4, 2, 1, 1)]);
    }

    #[test]
    fn test_kazali_converts_minions() {
        let dists = apply_modification(base_distribution(10), SetupModification::Kazali, &[], &[]);
        assert_eq!(dists.len(), 6);
        assert!(dists.iter().all(|d| d.minion == 0 && d.demon == 1 && d.total() == 10));
        assert!(dists.contains(&Distribution::new(9, 0, 0, 1)));
        assert!(dists.contains(&Distribution::new(4, 5, 0, 1)));
    }

    #[test]
    fn test_xaan_keeps_minions() {
        let dists = apply_modification(base_distribution(10), SetupModification::Xaan, &[], &[]);
        assert_eq!(dists.len(), 6);
        assert!(dists.iter().all(|d| d.minion == 2 && d.total() == 10));
    }

    #[test]
    fn test_summoner_and_small_tweaks() {
        let base = base_distribution(7);
        assert_eq!(
            apply_modification(base, SetupModification::Summoner, &[], &[]),
            vec![Distribution::new(6, 0, 1, 0)]
        );
        assert_eq!(
            apply_modification(base, SetupModification::Drunk, &[], &[]),
            vec![Distribution::new(6, 0, 1, 1)]
        );
        assert_eq!(
            apply_modification(base, SetupModification::ExtraMinion, &[], &[]),
            vec![Distribution::new(5, 0, 2, 1)]
        );
        assert_eq!(
            apply_modification(base, SetupModification::Hannibal, &[], &[]),
            vec![Distribution::new(6, 0, 1, 1)]
        );
        assert_eq!(
            apply_modification(base, SetupModification::MinionPpp, &[], &[]),
            vec![Distribution::new(6, 0, 0, 1)]
        );
        assert_eq!(
            apply_modification(base, SetupModification::BabyGronk, &[], &[]),
            vec![Distribution::new(3, 0, 3, 1)]
        );
    }

    #[test]
    fn test_bag_slot_table() {
        for id in ["drunk", "marionette", "lilmonsta", "hannibal"] {
            assert!(!SetupModification::for_character(id).unwrap().occupies_bag_slot(), "{}", id);
        }
        for id in ["baron", "riot", "hermit", "villageidiot"] {
            assert!(SetupModification::for_character(id).unwrap().occupies_bag_slot(), "{}", id);
        }
        assert_eq!(SetupModification::for_character("chef"), None);
    }

    #[test]
    fn test_output_is_deduplicated() {
        let script = characters(&[
            "washerwoman", "chef", "empath", "monk", "investigator", "butler", "saint", "recluse",
            "balloonist", "poisoner", "godfather", "imp",
        ]);
        let selected = pick(&script, &["balloonist", "godfather"]);
        let dists = target_distributions(9, &selected, &script);
        let mut unique = dists.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), dists.len());
    }
}
