//! Localized user-facing messages
//!
//! Messages live in `i18n/messages.toml` and are embedded at compile time.
//! A copy at `i18n/messages.toml` relative to the working directory takes
//! precedence, so wording can change without a rebuild.

use actix_web::{http::header, HttpRequest};
use once_cell::sync::Lazy;
use serde::Deserialize;
use ssum_shared::Language;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const EMBEDDED_MESSAGES: &str = include_str!("../../i18n/messages.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub ko: String,
    pub en: String,
    pub http_status: u16,
}

impl Message {
    pub fn text(&self, lang: Language) -> &str {
        match lang {
            Language::Korean => &self.ko,
            Language::English => &self.en,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub validation: HashMap<String, Message>,
    pub auth: HashMap<String, Message>,
    pub verification: HashMap<String, Message>,
    pub general: HashMap<String, Message>,
    pub success: HashMap<String, Message>,
}

pub static MESSAGES: Lazy<Messages> = Lazy::new(load_messages);

fn load_messages() -> Messages {
    let override_path = Path::new("i18n/messages.toml");
    if override_path.exists() {
        match fs::read_to_string(override_path)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str(&content).map_err(|e| e.to_string()))
        {
            Ok(messages) => return messages,
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable i18n/messages.toml"),
        }
    }

    toml::from_str(EMBEDDED_MESSAGES).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Embedded messages failed to parse");
        Messages::default()
    })
}

/// Look up a message as `(text, http_status)`
pub fn message(category: &str, key: &str, lang: Language) -> Option<(String, u16)> {
    let messages = &*MESSAGES;

    let category_map = match category {
        "validation" => &messages.validation,
        "auth" => &messages.auth,
        "verification" => &messages.verification,
        "general" => &messages.general,
        "success" => &messages.success,
        _ => return None,
    };

    category_map
        .get(key)
        .map(|msg| (msg.text(lang).to_string(), msg.http_status))
}

/// Message text with `{name}` placeholders filled in
pub fn message_with(
    category: &str,
    key: &str,
    lang: Language,
    params: &[(&str, String)],
) -> Option<(String, u16)> {
    message(category, key, lang).map(|(text, status)| (format_message(&text, params), status))
}

pub fn format_message(template: &str, params: &[(&str, String)]) -> String {
    let mut result = template.to_string();
    for (key, value) in params {
        result = result.replace(&format!("{{{}}}", key), value);
    }
    result
}

/// Response language negotiated from `Accept-Language`
pub fn request_language(req: &HttpRequest) -> Language {
    Language::from_accept_language(
        req.headers()
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_embedded_messages_parse() {
        let messages: Messages = toml::from_str(EMBEDDED_MESSAGES).unwrap();
        assert_eq!(messages.auth["KAKAO_ACCOUNT"].http_status, 409);
        assert_eq!(messages.verification["COOLDOWN"].http_status, 429);
        assert!(messages.success.contains_key("CODE_SENT"));
    }

    #[test]
    fn test_message_in_both_languages() {
        let (ko, status) = message("auth", "PHONE_NOT_REGISTERED", Language::Korean).unwrap();
        let (en, _) = message("auth", "PHONE_NOT_REGISTERED", Language::English).unwrap();
        assert_eq!(status, 404);
        assert_eq!(ko, "등록되지 않은 전화번호입니다.");
        assert_eq!(en, "This phone number is not registered.");
        assert!(message("auth", "NO_SUCH_KEY", Language::Korean).is_none());
        assert!(message("billing", "NOT_FOUND", Language::Korean).is_none());
    }

    #[test]
    fn test_placeholders_filled() {
        let (text, _) =
            message_with("verification", "MISMATCH", Language::Korean, &[("remaining", "3".to_string())])
                .unwrap();
        assert_eq!(text, "인증번호가 일치하지 않습니다. (남은 시도: 3회)");

        let (text, _) =
            message_with("verification", "COOLDOWN", Language::English, &[("seconds", "12".to_string())])
                .unwrap();
        assert_eq!(text, "Please try again in 12 seconds.");
    }

    #[test]
    fn test_request_language() {
        let req = TestRequest::default()
            .insert_header((header::ACCEPT_LANGUAGE, "en-US,en;q=0.9"))
            .to_http_request();
        assert_eq!(request_language(&req), Language::English);

        let req = TestRequest::default().to_http_request();
        assert_eq!(request_language(&req), Language::Korean);
    }
}
