//! Zodiac signs and their configured profiles.
//!
//! `ZodiacSign` is a closed enumeration: raw user input goes through
//! [`ZodiacSign::parse`], which normalizes English and Ukrainian names and
//! rejects everything else. Sign profiles (traits + specificity) are loaded
//! once from a YAML file into a [`SignBook`] and stay immutable for the
//! process lifetime.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// All signs in zodiac order.
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Canonical English name, used as the storage and JSON key.
    pub fn name_en(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    /// Ukrainian display name.
    pub fn name_ua(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Овен",
            ZodiacSign::Taurus => "Телець",
            ZodiacSign::Gemini => "Близнюки",
            ZodiacSign::Cancer => "Рак",
            ZodiacSign::Leo => "Лев",
            ZodiacSign::Virgo => "Діва",
            ZodiacSign::Libra => "Терези",
            ZodiacSign::Scorpio => "Скорпіон",
            ZodiacSign::Sagittarius => "Стрілець",
            ZodiacSign::Capricorn => "Козеріг",
            ZodiacSign::Aquarius => "Водолій",
            ZodiacSign::Pisces => "Риби",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "♈",
            ZodiacSign::Taurus => "♉",
            ZodiacSign::Gemini => "♊",
            ZodiacSign::Cancer => "♋",
            ZodiacSign::Leo => "♌",
            ZodiacSign::Virgo => "♍",
            ZodiacSign::Libra => "♎",
            ZodiacSign::Scorpio => "♏",
            ZodiacSign::Sagittarius => "♐",
            ZodiacSign::Capricorn => "♑",
            ZodiacSign::Aquarius => "♒",
            ZodiacSign::Pisces => "♓",
        }
    }

    /// Emoji plus Ukrainian name, e.g. "♌ Лев".
    pub fn display(self) -> String {
        format!("{} {}", self.emoji(), self.name_ua())
    }

    /// Normalizes raw user input against the closed set of sign names.
    ///
    /// Accepts English and Ukrainian names, any case, surrounding whitespace.
    /// Returns `None` for anything that does not match exactly one sign.
    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|sign| {
            sign.name_en().to_lowercase() == needle || sign.name_ua().to_lowercase() == needle
        })
    }

    /// Strict lookup by the canonical English name, as stored in the database.
    pub fn from_name_en(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sign| sign.name_en() == name)
    }
}

/// Static per-sign description loaded from configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignProfile {
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub specificity: String,
}

/// Immutable lookup of sign profiles, loaded once at startup.
#[derive(Debug, Clone)]
pub struct SignBook {
    profiles: HashMap<ZodiacSign, SignProfile>,
}

impl SignBook {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sign config {}", path.display()))?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let parsed: BTreeMap<String, SignProfile> =
            serde_yaml::from_str(raw).context("Invalid sign config YAML")?;

        let mut profiles = HashMap::new();
        for (name, profile) in parsed {
            let sign = ZodiacSign::parse(&name)
                .ok_or_else(|| anyhow!("Unknown sign '{}' in sign config", name))?;
            profiles.insert(sign, profile);
        }

        if profiles.is_empty() {
            return Err(anyhow!("Sign config contains no signs"));
        }

        Ok(Self { profiles })
    }

    /// Configured signs in zodiac order.
    pub fn signs(&self) -> Vec<ZodiacSign> {
        ZodiacSign::ALL
            .into_iter()
            .filter(|sign| self.profiles.contains_key(sign))
            .collect()
    }

    pub fn profile(&self, sign: ZodiacSign) -> Option<&SignProfile> {
        self.profiles.get(&sign)
    }

    /// Comma-separated Ukrainian names of all configured signs, for the
    /// "unknown sign" error reply.
    pub fn valid_names(&self) -> String {
        self.signs()
            .into_iter()
            .map(|sign| sign.name_ua().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Profiles keyed by English name, serialized for the daily prompt.
    pub fn prompt_payload(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for sign in self.signs() {
            if let Some(profile) = self.profiles.get(&sign) {
                map.insert(
                    sign.name_en().to_string(),
                    serde_json::json!({
                        "traits": profile.traits,
                        "specificity": profile.specificity,
                    }),
                );
            }
        }
        serde_json::Value::Object(map)
    }
}
