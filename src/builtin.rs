//! Character data bundled with the crate: the two raw role lists, the night
//! sheet and the static override layers.

use crate::character::RoleType;
use crate::night_order::{NightOrder, NightSheet, DAWN, DEMON_INFO, DUSK, MINION_INFO};
use crate::overrides::{merge_overrides, HomebrewMeta, Override, OverrideLayer, OverrideSource};
use crate::registry::{build_registry, OnlineRole, Registry, ScriptRole};

macro_rules! define_characters {
    (@night $text:literal) => { $text };
    (@night) => { "" };

    (
        $(
            $id:literal: $name:literal => {
                team: $team:ident,
                ability: $ability:literal
                $(, all_nights: $all_nights:literal)?
                $(, first_night: $first_night:literal)?
                $(, other_nights: $other_nights:literal)?
            }
        ),* $(,)?
    ) => {
        /// Identity list: id, display name and role type.
        pub fn script_roles() -> Vec<ScriptRole> {
            vec![
                $(ScriptRole {
                    id: $id.to_string(),
                    name: $name.to_string(),
                    role_type: stringify!($team).to_lowercase(),
                },)*
            ]
        }

        /// Detail list: ability and night reminder text.
        pub fn online_roles() -> Vec<OnlineRole> {
            vec![
                $(OnlineRole {
                    id: $id.to_string(),
                    ability: Some($ability.to_string()),
                    first_night_reminder: define_characters!(@night $($all_nights)? $($first_night)?).to_string(),
                    other_night_reminder: define_characters!(@night $($all_nights)? $($other_nights)?).to_string(),
                },)*
            ]
        }
    };
}

define_characters! {
    // Trouble Brewing townsfolk
    "washerwoman": "Washerwoman" => {
        team: Townsfolk,
        ability: "You start knowing that 1 of 2 players is a particular Townsfolk.",
        first_night: "Show the Townsfolk character token. Point to both the TOWNSFOLK and WRONG players."
    },
    "librarian": "Librarian" => {
        team: Townsfolk,
        ability: "You start knowing that 1 of 2 players is a particular Outsider. (Or that zero are in play.)",
        first_night: "Show the Outsider character token. Point to both the OUTSIDER and WRONG players."
    },
    "investigator": "Investigator" => {
        team: Townsfolk,
        ability: "You start knowing that 1 of 2 players is a particular Minion.",
        first_night: "Show the Minion character token. Point to both the MINION and WRONG players."
    },
    "chef": "Chef" => {
        team: Townsfolk,
        ability: "You start knowing how many pairs of evil players there are.",
        first_night: "Give a finger signal."
    },
    "empath": "Empath" => {
        team: Townsfolk,
        ability: "Each night, you learn how many of your 2 alive neighbours are evil.",
        all_nights: "Give a finger signal."
    },
    "fortune_teller": "Fortune Teller" => {
        team: Townsfolk,
        ability: "Each night, choose 2 players: you learn if either is a Demon. There is a good player that registers as a Demon to you.",
        all_nights: "The Fortune Teller chooses 2 players. Nod if either is the Demon (or the RED HERRING)."
    },
    "undertaker": "Undertaker" => {
        team: Townsfolk,
        ability: "Each night*, you learn which character died by execution today.",
        other_nights: "If a player was executed today, show their character token."
    },
    "monk": "Monk" => {
        team: Townsfolk,
        ability: "Each night*, choose a player (not yourself): they are safe from the Demon tonight.",
        other_nights: "The Monk chooses a player."
    },
    "ravenkeeper": "Ravenkeeper" => {
        team: Townsfolk,
        ability: "If you die at night, you are woken to choose a player: you learn their character.",
        other_nights: "If the Ravenkeeper died tonight, they choose a player. Show that player's character token."
    },
    "virgin": "Virgin" => {
        team: Townsfolk,
        ability: "The 1st time you are nominated, if the nominator is a Townsfolk, they are executed immediately."
    },
    "slayer": "Slayer" => {
        team: Townsfolk,
        ability: "Once per game, during the day, publicly choose a player: if they are the Demon, they die."
    },
    "soldier": "Soldier" => {
        team: Townsfolk,
        ability: "You are safe from the Demon."
    },
    "mayor": "Mayor" => {
        team: Townsfolk,
        ability: "If only 3 players live & no execution occurs, your team wins. If you die at night, another player might die instead."
    },

    // Trouble Brewing outsiders
    "butler": "Butler" => {
        team: Outsider,
        ability: "Each night, choose a player (not yourself): tomorrow, you may only vote if they are voting too.",
        all_nights: "The Butler chooses a player."
    },
    "drunk": "Drunk" => {
        team: Outsider,
        ability: "You do not know you are the Drunk. You think you are a Townsfolk character, but you are not."
    },
    "recluse": "Recluse" => {
        team: Outsider,
        ability: "You might register as evil & as a Minion or Demon, even if dead."
    },
    "saint": "Saint" => {
        team: Outsider,
        ability: "If you die by execution, your team loses."
    },

    // Trouble Brewing minions
    "poisoner": "Poisoner" => {
        team: Minion,
        ability: "Each night, choose a player: they are poisoned tonight and tomorrow day.",
        all_nights: "The Poisoner chooses a player."
    },
    "spy": "Spy" => {
        team: Minion,
        ability: "Each night, you see the Grimoire. You might register as good & as a Townsfolk or Outsider, even if dead.",
        all_nights: "Show the Grimoire for as long as the Spy needs."
    },
    "scarlet_woman": "Scarlet Woman" => {
        team: Minion,
        ability: "If there are 5 or more players alive & the Demon dies, you become the Demon. (Travellers don't count.)",
        other_nights: "If the Scarlet Woman became the Demon today, show them the YOU ARE token, then the Demon token."
    },
    "baron": "Baron" => {
        team: Minion,
        ability: "There are extra Outsiders in play. [+2 Outsiders]"
    },

    // Trouble Brewing demon
    "imp": "Imp" => {
        team: Demon,
        ability: "Each night*, choose a player: they die. If you kill yourself this way, a Minion becomes the Imp.",
        other_nights: "The Imp chooses a player. If the Imp chose themselves, replace a Minion's token with a spare Imp token."
    },

    // Setup-modifying characters from other editions
    "balloonist": "Balloonist" => {
        team: Townsfolk,
        ability: "Each night, you learn a player of a different character type than last night. [+0 or +1 Outsider]",
        all_nights: "Point to a player whose character type differs from last night's."
    },
    "huntsman": "Huntsman" => {
        team: Townsfolk,
        ability: "Once per game, at night, choose a living player: the Damsel, if chosen, becomes a not-in-play Townsfolk. [+the Damsel]",
        all_nights: "The Huntsman might choose a player."
    },
    "choirboy": "Choirboy" => {
        team: Townsfolk,
        ability: "If the Demon kills the King, you learn which player is the Demon. [+the King]",
        other_nights: "If the King was killed by the Demon, point to the Demon player."
    },
    "king": "King" => {
        team: Townsfolk,
        ability: "Each night, if the dead equal or outnumber the living, you learn 1 alive character. The Demon knows you are the King.",
        all_nights: "Wake the Demon and show them the THIS PLAYER IS token, then the King token, then point to the King."
    },
    "village_idiot": "Village Idiot" => {
        team: Townsfolk,
        ability: "Each night, choose a player: you learn their alignment. [+0 to +2 Village Idiots. 1 of the extras is drunk]",
        all_nights: "The Village Idiot chooses a player. Give a thumbs signal for their alignment."
    },
    "atheist": "Atheist" => {
        team: Townsfolk,
        ability: "The Storyteller can break the game rules, and if executed, good wins, even if you are dead. [No evil characters]"
    },
    "hermit": "Hermit" => {
        team: Outsider,
        ability: "You have all Outsider abilities. [-0 or -1 Outsider]"
    },
    "heretic": "Heretic" => {
        team: Outsider,
        ability: "Whoever wins, loses & whoever loses, wins, even if you are dead."
    },
    "damsel": "Damsel" => {
        team: Outsider,
        ability: "All Minions know a Damsel is in play. If a Minion publicly guesses you (once), your team loses.",
        first_night: "Wake all Minions and show them the Damsel token."
    },
    "godfather": "Godfather" => {
        team: Minion,
        ability: "You start knowing which Outsiders are in play. If 1 died today, choose a player tonight: they die. [-1 or +1 Outsider]",
        first_night: "Show the Godfather the character tokens of all in-play Outsiders.",
        other_nights: "If an Outsider died today, the Godfather chooses a player."
    },
    "marionette": "Marionette" => {
        team: Minion,
        ability: "You think you are a good character, but you are not. The Demon knows who you are. [You neighbour the Demon]",
        first_night: "Wake the Demon. Show the THIS PLAYER IS token, the Marionette token, and point to the Marionette."
    },
    "xaan": "Xaan" => {
        team: Minion,
        ability: "On night X, all Townsfolk are poisoned until dusk. [X Outsiders]",
        all_nights: "If it is night X, mark all Townsfolk as poisoned."
    },
    "summoner": "Summoner" => {
        team: Minion,
        ability: "You get 3 bluffs. On the 3rd night, choose a player: they become an evil Demon of your choice. [No Demon]",
        first_night: "Show the THESE CHARACTERS ARE NOT IN PLAY token and 3 bluffs.",
        other_nights: "If it is the 3rd night, the Summoner chooses a player and a Demon."
    },
    "fang_gu": "Fang Gu" => {
        team: Demon,
        ability: "Each night*, choose a player: they die. The 1st Outsider this kills becomes an evil Fang Gu & you die instead. [+1 Outsider]",
        other_nights: "The Fang Gu chooses a player."
    },
    "vigormortis": "Vigormortis" => {
        team: Demon,
        ability: "Each night*, choose a player: they die. Minions you kill keep their ability & poison 1 Townsfolk neighbour. [-1 Outsider]",
        other_nights: "The Vigormortis chooses a player."
    },
    "riot": "Riot" => {
        team: Demon,
        ability: "On day 3, Minions become Riot & nominees die but nominate an alive player immediately. [All Minions are Riot]"
    },
    "legion": "Legion" => {
        team: Demon,
        ability: "Each night*, a player might die. Executions fail if only evil voted. You register as a Minion too. [Most players are Legion]",
        other_nights: "Choose a player, who dies."
    },
    "lil_monsta": "Lil' Monsta" => {
        team: Demon,
        ability: "Each night, Minions choose who babysits Lil' Monsta & \"is the Demon\". Each night*, a player might die. [+1 Minion]",
        all_nights: "Wake all Minions. They choose who babysits Lil' Monsta."
    },
    "kazali": "Kazali" => {
        team: Demon,
        ability: "Each night*, choose a player: they die. [You choose which players are which Minions. -? to +? Outsiders]",
        first_night: "The Kazali chooses players to become Minions.",
        other_nights: "The Kazali chooses a player."
    },
    "lord_of_typhon": "Lord of Typhon" => {
        team: Demon,
        ability: "Each night*, choose a player: they die. [Evil characters are in a line. You are in the middle. +1 Minion. -? to +? Outsiders]",
        first_night: "Wake the Lord of Typhon and show the YOU ARE token and their neighbouring Minions.",
        other_nights: "The Lord of Typhon chooses a player."
    },

    // Fabled and travellers
    "sentinel": "Sentinel" => {
        team: Fabled,
        ability: "There might be 1 extra or 1 fewer Outsider in play."
    },
    "bootlegger": "Bootlegger" => {
        team: Fabled,
        ability: "This script has homebrew characters or rules.",
        first_night: "Announce the homebrew rules in play."
    },
    "scapegoat": "Scapegoat" => {
        team: Traveler,
        ability: "If a player of your alignment is executed, you might be executed instead."
    },
}

/// The canonical night sheet for the bundled characters.
pub fn night_sheet() -> NightSheet {
    let first_night = [
        DUSK, "Kazali", MINION_INFO, "Summoner", DEMON_INFO, "King", "Marionette", "Lil' Monsta", "Xaan",
        "Poisoner", "Godfather", "Huntsman", "Damsel", "Washerwoman", "Librarian", "Investigator", "Chef",
        "Empath", "Fortune Teller", "Butler", "Balloonist", "Village Idiot", "Spy", DAWN,
    ];
    let other_nights = [
        DUSK, "Poisoner", "Monk", "Scarlet Woman", "Lil' Monsta", "Imp", "Fang Gu", "Vigormortis", "Legion",
        "Kazali", "Lord of Typhon", "Summoner", "Godfather", "Xaan", "Ravenkeeper", "Undertaker", "Empath",
        "Fortune Teller", "Butler", "Spy", "Balloonist", "Huntsman", "Choirboy", "King", "Village Idiot", DAWN,
    ];
    NightSheet {
        first_night: first_night.iter().map(|s| s.to_string()).collect(),
        other_nights: other_nights.iter().map(|s| s.to_string()).collect(),
    }
}

fn text(s: &str) -> Option<String> {
    Some(s.to_string())
}

fn homebrew(
    name: &str,
    role_type: RoleType,
    first_night_index: Option<i32>,
    other_nights_index: Option<i32>,
) -> Option<HomebrewMeta> {
    Some(HomebrewMeta {
        name: name.to_string(),
        role_type,
        first_night_index,
        other_nights_index,
    })
}

/// Static override layers, one per bundled source.
pub fn override_layers() -> Vec<OverrideLayer> {
    let base_game = OverrideLayer::new(OverrideSource::BaseGame).with(
        "undertaker",
        Override {
            other_nights: text("If a player was executed today, show their character token. If nobody was executed, show nothing."),
            ..Default::default()
        },
    );

    let new_roles = OverrideLayer::new(OverrideSource::NewRoles)
        .with(
            "xaan",
            Override {
                ability: text("On night X, all Townsfolk are poisoned until dusk. [X Outsiders]"),
                nights: text("If it is night X, mark all Townsfolk as poisoned until dusk."),
                ..Default::default()
            },
        )
        .with(
            "kazali",
            Override {
                first_night: text("The Kazali points at players and chooses a Minion for each. Wake each new Minion to show them their character."),
                ..Default::default()
            },
        );

    let themed = OverrideLayer::new(OverrideSource::ThemedVariants).with(
        "lilmonsta",
        Override {
            nights: text("Wake all Minions together. They point to the player who babysits Lil' Monsta."),
            ..Default::default()
        },
    );

    let homebrew_packs = OverrideLayer::new(OverrideSource::HomebrewPacks)
        .with(
            "actor",
            Override {
                ability: text("All good players are Actors. Each night, learn whether a chosen player is an Actor."),
                homebrew: homebrew("Actor", RoleType::Townsfolk, None, None),
                ..Default::default()
            },
        )
        .with(
            "legionary",
            Override {
                ability: text("You start knowing another Legionary. [+0 to +2 Legionaries]"),
                homebrew: homebrew("Legionary", RoleType::Townsfolk, None, None),
                ..Default::default()
            },
        )
        .with(
            "hannibal",
            Override {
                ability: text("Two good players believe they might be Hannibal. Each night*, one of them chooses a player: they die. [+1 Townsfolk]"),
                other_nights: text("Wake the active Hannibal option. They choose a player."),
                homebrew: homebrew("Hannibal", RoleType::Demon, None, Some(5)),
                ..Default::default()
            },
        )
        .with(
            "ppp",
            Override {
                ability: text("There is one fewer Minion in play and one more Townsfolk. [-1 Minion]"),
                homebrew: homebrew("PPP", RoleType::Minion, None, None),
                ..Default::default()
            },
        )
        .with(
            "babygronk",
            Override {
                ability: text("Each night*, choose a player: they die. [+2 Minions]"),
                other_nights: text("Baby Gronk chooses a player."),
                homebrew: homebrew("Baby Gronk", RoleType::Demon, None, Some(6)),
                ..Default::default()
            },
        );

    let special_modes = OverrideLayer::new(OverrideSource::SpecialModes).with(
        "marionette",
        Override {
            first_night: text("Wake the Demon. Point to the Marionette, who neighbours them."),
            ..Default::default()
        },
    );

    let crossover = OverrideLayer::new(OverrideSource::Crossover).with(
        "legion",
        Override {
            ability: text("Each night*, a player might die. Executions fail if only evil voted. You register as a Minion too. [Most players are Legion]"),
            other_nights: text("Choose a player, who dies. Legion players may open their eyes."),
            ..Default::default()
        },
    );

    vec![base_game, new_roles, themed, homebrew_packs, special_modes, crossover]
}

/// Registry over the bundled data and static override layers.
pub fn registry() -> Registry {
    registry_with(Vec::new())
}

/// Registry over the bundled data with `extra` layers (usually the dynamic
/// homebrew layer) merged on top of the static ones.
pub fn registry_with(extra: Vec<OverrideLayer>) -> Registry {
    let mut layers = override_layers();
    layers.extend(extra);
    let overrides = merge_overrides(layers);
    let night_order = NightOrder::new(&night_sheet());
    build_registry(&script_roles(), &online_roles(), &night_order, &overrides)
}
