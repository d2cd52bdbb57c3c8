//! Language and internationalization types

use serde::{Deserialize, Serialize};

/// Language used for user-facing messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Pick a language from an `Accept-Language` header value
    ///
    /// Korean is the default; English is chosen only when it is the first
    /// preference.
    pub fn from_accept_language(header: Option<&str>) -> Self {
        match header.map(|h| h.trim().to_lowercase()) {
            Some(h) if h.starts_with("en") => Language::English,
            _ => Language::Korean,
        }
    }

    /// Get language code (ISO 639-1)
    pub fn code(&self) -> &'static str {
        match self {
            Language::Korean => "ko",
            Language::English => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
