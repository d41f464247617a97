use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UtilsError;

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Indonesian,
    Korean,
    Japanese,
    Chinese,
    Spanish,
    French,
    German,
}

impl Language {
    /// Get language code (ISO 639-1)
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Indonesian => "id",
            Language::Korean => "ko",
            Language::Japanese => "ja",
            Language::Chinese => "zh",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
        }
    }

    /// Get language name in its own script
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Indonesian => "Bahasa Indonesia",
            Language::Korean => "한국어",
            Language::Japanese => "日本語",
            Language::Chinese => "中文",
            Language::Spanish => "Español",
            Language::French => "Français",
            Language::German => "Deutsch",
        }
    }

    /// Get all supported languages
    pub fn all() -> Vec<Language> {
        vec![
            Language::English,
            Language::Indonesian,
            Language::Korean,
            Language::Japanese,
            Language::Chinese,
            Language::Spanish,
            Language::French,
            Language::German,
        ]
    }

    /// Parse language from code, accepting region subtags like `en-US` or `id_ID`
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();

        match primary.as_str() {
            "en" => Some(Language::English),
            "id" | "in" => Some(Language::Indonesian),
            "ko" => Some(Language::Korean),
            "ja" => Some(Language::Japanese),
            "zh" => Some(Language::Chinese),
            "es" => Some(Language::Spanish),
            "fr" => Some(Language::French),
            "de" => Some(Language::German),
            _ => None,
        }
    }

    /// Separator placed between groups of three integer digits
    pub fn group_separator(&self) -> &'static str {
        match self {
            Language::English | Language::Korean | Language::Japanese | Language::Chinese => ",",
            Language::Indonesian | Language::Spanish | Language::German => ".",
            // CLDR uses a narrow no-break space for French
            Language::French => "\u{202f}",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UtilsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s)
            .ok_or_else(|| UtilsError::config(format!("Unsupported language: {}", s)))
    }
}
