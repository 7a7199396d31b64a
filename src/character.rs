use serde::{Deserialize, Serialize};

/// Character category. The first four are counted by setup distributions;
/// travellers and fabled never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleType {
    Townsfolk,
    Outsider,
    Minion,
    Demon,
    #[serde(alias = "traveller")]
    Traveler,
    Fabled,
}

impl RoleType {
    /// The categories that take part in distribution counts.
    pub const COUNTED: [RoleType; 4] = [
        RoleType::Townsfolk,
        RoleType::Outsider,
        RoleType::Minion,
        RoleType::Demon,
    ];

    pub fn from_str_or_shorthand(s: &str) -> Option<RoleType> {
        match s.to_lowercase().as_str() {
            "townsfolk" | "tf" => Some(RoleType::Townsfolk),
            "outsider" | "os" => Some(RoleType::Outsider),
            "minion" | "mn" => Some(RoleType::Minion),
            "demon" | "dm" => Some(RoleType::Demon),
            "traveler" | "traveller" => Some(RoleType::Traveler),
            "fabled" => Some(RoleType::Fabled),
            _ => None,
        }
    }

    pub const fn is_good(self) -> bool {
        matches!(self, RoleType::Townsfolk | RoleType::Outsider)
    }

    pub const fn is_evil(self) -> bool {
        matches!(self, RoleType::Minion | RoleType::Demon)
    }

    pub const fn is_special(self) -> bool {
        matches!(self, RoleType::Traveler | RoleType::Fabled)
    }

    pub const fn name(self) -> &'static str {
        match self {
            RoleType::Townsfolk => "Townsfolk",
            RoleType::Outsider => "Outsider",
            RoleType::Minion => "Minion",
            RoleType::Demon => "Demon",
            RoleType::Traveler => "Traveler",
            RoleType::Fabled => "Fabled",
        }
    }
}

/// Reduce a display name or raw id to the canonical lookup key:
/// lowercase, with spaces, apostrophes, hyphens and underscores removed.
pub fn normalize_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '\'' | '\u{2019}' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Position used when a night-order lookup fails. Sorts before every real entry.
pub const NOT_FOUND: i32 = -1;

/// What a character does in one night phase and where it happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NightAction {
    pub text: String,
    /// Index into the phase's global night order, or [`NOT_FOUND`].
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub role_type: RoleType,
    pub ability: Option<String>,
    pub first_night: Option<NightAction>,
    pub other_nights: Option<NightAction>,
}

impl Character {
    pub fn is_good(&self) -> bool {
        self.role_type.is_good()
    }

    pub fn is_evil(&self) -> bool {
        self.role_type.is_evil()
    }

    pub fn is_special(&self) -> bool {
        self.role_type.is_special()
    }

    /// Id of the character this entry duplicates, for pseudo-characters like
    /// `villageidiot-2`; plain characters return their own id.
    pub fn base_id(&self) -> &str {
        match self.id.rsplit_once('-') {
            Some((base, suffix)) if suffix.chars().all(|c| c.is_ascii_digit()) => base,
            _ => &self.id,
        }
    }
}
