//! Builtin and file-based combatant definitions.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::combatant::{Character, Enemy, Spell};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse JSON {label}: {source}")]
    Json {
        label: String,
        source: serde_json::Error,
    },
    #[error("failed to parse YAML {label}: {source}")]
    Yaml {
        label: String,
        source: serde_yaml::Error,
    },
    #[error("unknown builtin {kind} '{id}'")]
    UnknownBuiltin { kind: &'static str, id: String },
    #[error("invalid {name}: {reason}")]
    Invalid { name: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// `.yaml`/`.yml` files are YAML, everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Format::Yaml
            }
            _ => Format::Json,
        }
    }
}

pub fn builtin_enemies() -> IndexMap<&'static str, &'static str> {
    IndexMap::from([
        ("goblin", include_str!("../content/enemies/goblin.json")),
        ("bog_witch", include_str!("../content/enemies/bog_witch.json")),
        ("cave_troll", include_str!("../content/enemies/cave_troll.json")),
    ])
}

pub fn builtin_characters() -> IndexMap<&'static str, &'static str> {
    IndexMap::from([
        ("wanderer", include_str!("../content/characters/wanderer.json")),
        ("hedge_mage", include_str!("../content/characters/hedge_mage.json")),
    ])
}

pub fn builtin_enemy(id: &str) -> Result<Enemy, ContentError> {
    let text = builtin_enemies()
        .get(id)
        .copied()
        .ok_or_else(|| ContentError::UnknownBuiltin {
            kind: "enemy",
            id: id.to_string(),
        })?;
    parse_enemy(id, text, Format::Json)
}

pub fn builtin_character(id: &str) -> Result<Character, ContentError> {
    let text = builtin_characters()
        .get(id)
        .copied()
        .ok_or_else(|| ContentError::UnknownBuiltin {
            kind: "character",
            id: id.to_string(),
        })?;
    parse_character(id, text, Format::Json)
}

pub fn load_enemy(path: &Path) -> Result<Enemy, ContentError> {
    let text = read(path)?;
    parse_enemy(&path.display().to_string(), &text, Format::from_path(path))
}

pub fn load_character(path: &Path) -> Result<Character, ContentError> {
    let text = read(path)?;
    parse_character(&path.display().to_string(), &text, Format::from_path(path))
}

pub fn parse_enemy(label: &str, text: &str, format: Format) -> Result<Enemy, ContentError> {
    let enemy: Enemy = parse(label, text, format)?;
    check_life(&enemy.name, enemy.life.maximum())?;
    check_spells(&enemy.name, &enemy.spells)?;
    Ok(enemy)
}

pub fn parse_character(label: &str, text: &str, format: Format) -> Result<Character, ContentError> {
    let character: Character = parse(label, text, format)?;
    check_life(&character.name, character.life.maximum())?;
    check_spells(&character.name, &character.spells)?;
    Ok(character)
}

fn read(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn parse<T: DeserializeOwned>(label: &str, text: &str, format: Format) -> Result<T, ContentError> {
    match format {
        Format::Json => serde_json::from_str(text).map_err(|source| ContentError::Json {
            label: label.to_string(),
            source,
        }),
        Format::Yaml => serde_yaml::from_str(text).map_err(|source| ContentError::Yaml {
            label: label.to_string(),
            source,
        }),
    }
}

fn check_life(name: &str, maximum: i32) -> Result<(), ContentError> {
    if maximum <= 0 {
        return Err(ContentError::Invalid {
            name: name.to_string(),
            reason: format!("maximum life points must be positive, got {}", maximum),
        });
    }
    Ok(())
}

fn check_spells(name: &str, spells: &[Spell]) -> Result<(), ContentError> {
    for spell in spells {
        if !(spell.damage_multiplier.is_finite() && spell.damage_multiplier > 0.0) {
            return Err(ContentError::Invalid {
                name: name.to_string(),
                reason: format!("spell '{}' needs a positive damage multiplier", spell.name),
            });
        }
        if spell.power_cost < 0 {
            return Err(ContentError::Invalid {
                name: name.to_string(),
                reason: format!("spell '{}' has a negative power cost", spell.name),
            });
        }
    }
    Ok(())
}
