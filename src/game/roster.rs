use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CUSTOM_MAX_HEALTH: u32 = 100;
pub const CUSTOM_ROLE: &str = "Designated Punching Bag";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Anything that is not clearly "female" is treated as male.
    pub fn parse_lenient(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "female" | "f" | "woman" | "女" => Gender::Female,
            _ => Gender::Male,
        }
    }
}

/// Immutable once a fight starts. The portrait is a reference (path or data
/// URL); producing it is somebody else's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub display_name: String,
    pub role_label: String,
    pub portrait: String,
    pub max_health: u32,
    pub gender: Gender,
    #[serde(default)]
    pub is_custom: bool,
}

impl Character {
    /// A user-made target. Max health is fixed low so custom fights are short.
    pub fn custom(name: impl Into<String>, gender: Gender, portrait: impl Into<String>) -> Self {
        Self {
            id: format!("custom-{}", Uuid::new_v4()),
            display_name: name.into(),
            role_label: CUSTOM_ROLE.to_string(),
            portrait: portrait.into(),
            max_health: CUSTOM_MAX_HEALTH,
            gender,
            is_custom: true,
        }
    }
}

fn entry(
    id: &str,
    name: &str,
    role: &str,
    portrait: &str,
    max_health: u32,
    gender: Gender,
) -> Character {
    Character {
        id: id.to_string(),
        display_name: name.to_string(),
        role_label: role.to_string(),
        portrait: portrait.to_string(),
        max_health,
        gender,
        is_custom: false,
    }
}

pub fn builtin_roster() -> Vec<Character> {
    vec![
        entry(
            "boss-1",
            "Nitpick Zhang",
            "Micromanager",
            "/assets/body_micromanager.png",
            1000,
            Gender::Male,
        ),
        entry("boss-2", "Gaslight Li", "Dreamer", "/assets/body_dreamer.png", 1200, Gender::Male),
        entry(
            "junior-1",
            "Buck-Passer Wang",
            "Buck-Passer",
            "/assets/body_slacker.png",
            800,
            Gender::Male,
        ),
        entry("senior-1", "Frosty Liu", "Ghost", "/assets/body_ghost.png", 900, Gender::Female),
    ]
}
