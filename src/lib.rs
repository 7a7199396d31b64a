//! Setup rules for Blood on the Clocktower.
//!
//! Builds a character registry from bundled data and override layers, orders
//! characters into night sequences, computes the legal Townsfolk/Outsider/
//! Minion/Demon distributions for a selection of setup-modifying characters,
//! validates selections against them, and completes partial selections at
//! random.

pub mod bag;
pub mod builtin;
pub mod character;
pub mod distribution;
pub mod error;
pub mod night_order;
pub mod overrides;
pub mod parse;
pub mod random;
pub mod registry;
pub mod script;
pub mod setup;

pub use bag::{split_selected_chars, validate_selection, Selection, SetupValidation};
pub use character::{normalize_id, Character, RoleType};
pub use distribution::{base_distribution, checked_player_count, same_distribution, Distribution};
pub use error::{Error, Result};
pub use random::{random_bluffs, random_complete_selection};
pub use registry::Registry;
pub use script::Script;
pub use setup::{apply_modification, target_distributions, SetupModification};
