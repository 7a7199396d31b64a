use thiserror::Error;

/// Errors for malformed static data and user input.
///
/// Data inconsistencies inside otherwise well-formed data (a character missing
/// from the night sheet, an unknown role type in a bundled list) are not errors;
/// they become [`crate::registry::Diagnostic`]s.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("homebrew script is missing its leading _meta entry")]
    MissingMeta,

    #[error("unknown team '{team}' for homebrew character '{name}'")]
    UnknownTeam { name: String, team: String },

    #[error("malformed script entry: {0}")]
    MalformedEntry(String),

    #[error("bag must be enclosed in curly braces: {0}")]
    UnbracedBag(String),

    #[error("unknown character name: '{name}'{}", format_suggestions(.suggestions))]
    UnknownCharacter {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("{0} players is outside the supported range of 5 to 15")]
    PlayerCount(usize),

    #[error("unknown script '{0}'")]
    UnknownScript(String),

    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn format_suggestions(suggestions: &[String]) -> String {
    match suggestions {
        [] => String::new(),
        [one] => format!("\n  Did you mean: {}?", one),
        many => format!("\n  Did you mean one of: {}?", many.join(", ")),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
