use std::path::{Path, PathBuf};
use std::process::ExitCode;

use botc_setup::bag::{occupies_bag_slot, split_selected_chars, BagSplit};
use botc_setup::builtin;
use botc_setup::overrides::homebrew_layer;
use botc_setup::parse::parse_bag;
use botc_setup::setup::modifying_characters;
use botc_setup::{
    base_distribution, checked_player_count, random_bluffs, random_complete_selection, target_distributions,
    validate_selection, Character, Error, Registry, Result, Script, Selection, SetupModification, SetupValidation,
};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Blood on the Clocktower setup tool
#[derive(Parser, Debug)]
#[command(name = "botc-setup")]
#[command(about = "Blood on the Clocktower setup validator and randomizer", long_about = None)]
struct Cli {
    /// Script to draw characters from: "trouble-brewing" (tb), "experimental", or a path to script JSON
    #[arg(short, long, global = true, default_value = "tb")]
    script: String,

    /// Homebrew script JSON whose characters extend or replace the bundled ones (repeatable)
    #[arg(long, global = true)]
    homebrew: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the legal distributions for a player count
    Targets {
        #[arg(short, long, value_parser = parse_player_count)]
        players: u8,

        /// Selected characters in format: {role1 role2 ...}
        bag: Option<String>,
    },

    /// Validate a role distribution bag
    ValidateRoleDistribution {
        /// Role bag in format: {role1 role2 role3 ...}
        bag: String,

        /// Player count; defaults to the number of selected characters that take a bag slot
        #[arg(short, long, value_parser = parse_player_count)]
        players: Option<u8>,
    },

    /// Print the first-night and other-nights wake order
    NightOrder {
        /// Characters in play; defaults to the whole script
        bag: Option<String>,
    },

    /// Complete a partial selection at random
    RandomSetup {
        #[arg(short, long, value_parser = parse_player_count)]
        players: u8,

        /// Characters that must be in play, in format: {role1 role2 ...}
        bag: Option<String>,

        /// Seed for a reproducible setup
        #[arg(long)]
        seed: Option<u64>,

        /// Also pick demon bluffs
        #[arg(long)]
        bluffs: bool,
    },

    /// List the bundled scripts
    ListScripts,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// The registry and the resolved characters of the chosen script.
struct Session {
    registry: Registry,
    characters: Vec<Character>,
}

fn parse_player_count(s: &str) -> std::result::Result<u8, String> {
    let count: usize = s.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    checked_player_count(count).map_err(|e| e.to_string())
}

fn run(cli: Cli) -> Result<ExitCode> {
    let session = || load_session(&cli.script, &cli.homebrew);

    match cli.command {
        Command::Targets { players, bag } => targets_cmd(&session()?.characters, players, bag.as_deref()),
        Command::ValidateRoleDistribution { bag, players } => {
            validate_role_distribution_cmd(&session()?.characters, &bag, players)
        }
        Command::NightOrder { bag } => {
            let session = session()?;
            night_order_cmd(&session.registry, &session.characters, bag.as_deref())
        }
        Command::RandomSetup {
            players,
            bag,
            seed,
            bluffs,
        } => random_setup_cmd(&session()?.characters, players, bag.as_deref(), seed, bluffs),
        Command::ListScripts => list_scripts_cmd(),
    }
}

fn load_session(script: &str, homebrew: &[PathBuf]) -> Result<Session> {
    let registry = load_registry(homebrew)?;
    let script = load_script(script)?;
    println!("Using script: {}", script.title);
    let characters = script.characters(&registry);
    Ok(Session { registry, characters })
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })
}

fn load_registry(homebrew: &[PathBuf]) -> Result<Registry> {
    if homebrew.is_empty() {
        return Ok(builtin::registry());
    }
    let documents = homebrew.iter().map(|path| read_file(path)).collect::<Result<Vec<_>>>()?;
    let layer = homebrew_layer(&documents)?;
    info!(characters = layer.entries.len(), "loaded homebrew layer");
    Ok(builtin::registry_with(vec![layer]))
}

fn load_script(name: &str) -> Result<Script> {
    if let Some(script) = Script::from_name(name) {
        return Ok(script);
    }
    let path = Path::new(name);
    if path.is_file() {
        return Script::from_json(&read_file(path)?);
    }
    Err(Error::UnknownScript(name.to_string()))
}

fn parse_optional_bag(bag: Option<&str>, characters: &[Character]) -> Result<Selection> {
    bag.map_or_else(|| Ok(Selection::new()), |bag| parse_bag(bag, characters))
}

fn print_modifications(selected: &[&Character]) {
    let modifying = modifying_characters(selected);
    if modifying.is_empty() {
        return;
    }
    println!("  Setup modifications:");
    for character in modifying {
        if let Some(modification) = SetupModification::for_character(character.base_id()) {
            println!("    {}: {:?}", character.name, modification);
        }
    }
}

fn print_split(split: &BagSplit) {
    println!("  Bag:");
    for entry in &split.bag {
        match entry.instance {
            Some(instance) => println!(
                "    - {} #{} ({})",
                entry.character.name,
                instance + 1,
                entry.character.role_type.name()
            ),
            None => println!("    - {} ({})", entry.character.name, entry.character.role_type.name()),
        }
    }
    if !split.outside_bag.is_empty() {
        println!("  Outside the bag:");
        for character in &split.outside_bag {
            println!("    - {} ({})", character.name, character.role_type.name());
        }
    }
}

fn targets_cmd(characters: &[Character], players: u8, bag: Option<&str>) -> Result<ExitCode> {
    let selection = parse_optional_bag(bag, characters)?;
    let selected = selection.characters(characters);

    println!("  Base setup: {}", base_distribution(players));
    print_modifications(&selected);
    println!("  Legal distributions:");
    for target in target_distributions(players, &modifying_characters(&selected), characters) {
        println!("    {}", target);
    }
    Ok(ExitCode::SUCCESS)
}

fn validate_role_distribution_cmd(characters: &[Character], bag: &str, players: Option<u8>) -> Result<ExitCode> {
    println!("Validating role distribution: {}", bag);

    let selection = parse_bag(bag, characters)?;
    let selected = selection.characters(characters);
    let player_count = match players {
        Some(players) => players,
        None => checked_player_count(selected.iter().filter(|c| occupies_bag_slot(c)).count())?,
    };
    println!("  Player count: {}", player_count);

    println!("  Roles specified:");
    for character in &selected {
        println!("    - {} ({})", character.name, character.role_type.name());
    }
    print_split(&split_selected_chars(characters, &selection, player_count));

    let validation = validate_selection(characters, &selection, player_count);
    if let SetupValidation::Valid { distribution } = &validation {
        println!("\nVALID: {}", distribution);
        return Ok(ExitCode::SUCCESS);
    }

    println!("\nINVALID: This role distribution violates BotC setup rules\n");
    println!("  Base setup: {}", base_distribution(player_count));
    print_modifications(&selected);
    if let SetupValidation::WrongDistribution { actual, targets } = &validation {
        println!("  Legal distributions:");
        for target in targets {
            println!("    {}", target);
        }
        println!("  Your bag contains: {}", actual);
    }
    for problem in validation.problems() {
        println!("  - {}", problem);
    }
    Ok(ExitCode::FAILURE)
}

fn night_order_cmd(registry: &Registry, characters: &[Character], bag: Option<&str>) -> Result<ExitCode> {
    let in_play: Vec<Character> = match bag {
        Some(bag) => {
            let selection = parse_bag(bag, characters)?;
            selection.characters(characters).into_iter().cloned().collect()
        }
        None => characters.iter().filter(|c| c.id == c.base_id()).cloned().collect(),
    };

    let sequences = registry.night_sequences(&in_play);
    println!("First night:");
    for (step, character) in sequences.first_night.iter().enumerate() {
        println!("  {:>2}. {}", step + 1, character.name);
    }
    println!("Other nights:");
    for (step, character) in sequences.other_nights.iter().enumerate() {
        println!("  {:>2}. {}", step + 1, character.name);
    }
    Ok(ExitCode::SUCCESS)
}

fn random_setup_cmd(
    characters: &[Character],
    players: u8,
    bag: Option<&str>,
    seed: Option<u64>,
    bluffs: bool,
) -> Result<ExitCode> {
    let partial = parse_optional_bag(bag, characters)?;
    let mut rng = seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);

    let Some(selection) = random_complete_selection(&mut rng, players, characters, &partial) else {
        eprintln!("Could not complete the selection for {} players; try again or change the bag", players);
        return Ok(ExitCode::FAILURE);
    };

    println!("Random setup for {} players:", players);
    print_split(&split_selected_chars(characters, &selection, players));
    if let SetupValidation::Valid { distribution } = validate_selection(characters, &selection, players) {
        println!("  Distribution: {}", distribution);
    }

    if bluffs {
        let bluffs = random_bluffs(&mut rng, characters, &selection, &Selection::new());
        println!("  Demon bluffs:");
        for character in bluffs.characters(characters) {
            println!("    - {}", character.name);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn list_scripts_cmd() -> Result<ExitCode> {
    let registry = builtin::registry();
    println!("Available scripts:");
    for script in Script::all() {
        println!("  {} ({} characters)", script.title, script.characters(&registry).len());
    }
    Ok(ExitCode::SUCCESS)
}
