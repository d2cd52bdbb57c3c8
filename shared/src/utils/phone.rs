//! Phone number utilities
//!
//! Subscriber numbers are exchanged in the national mobile format
//! `010XXXXXXXX` (11 digits, no separators).

use once_cell::sync::Lazy;
use regex::Regex;

// Korean mobile number in national format
static KOREAN_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^010[0-9]{8}$").expect("mobile number pattern is valid")
});

// Six-digit verification code
static VERIFICATION_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{6}$").expect("verification code pattern is valid")
});

/// Normalize a phone number by removing hyphens and whitespace
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Check if an already-normalized phone number is a valid mobile number
pub fn is_valid_mobile(phone: &str) -> bool {
    KOREAN_MOBILE_REGEX.is_match(phone)
}

/// Normalize and validate in one step
///
/// Returns the normalized number, or `None` when it is not a mobile number.
pub fn parse_mobile(phone: &str) -> Option<String> {
    let normalized = normalize_phone_number(phone);
    is_valid_mobile(&normalized).then_some(normalized)
}

/// Check if a submitted verification code has the expected shape
pub fn is_valid_verification_code(code: &str) -> bool {
    VERIFICATION_CODE_REGEX.is_match(code)
}

/// Mask a phone number for logs (e.g., 010****8888)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 && normalized.is_ascii() {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}
