//! Redis key layout for verification state
//!
//! - `{prefix}:verify:req:{phone}:{purpose}` - hash holding the active request
//! - `{prefix}:verify:iss:{phone}` - sorted set of issuances scored by epoch millis
//! - `{prefix}:verify:token:{token}` - JSON token record

use ssum_core::domain::entities::Purpose;

pub fn request_key(prefix: &str, phone: &str, purpose: Purpose) -> String {
    format!("{}:verify:req:{}:{}", prefix, phone, purpose.as_str())
}

pub fn request_pattern(prefix: &str) -> String {
    format!("{}:verify:req:*", prefix)
}

pub fn issuance_key(prefix: &str, phone: &str) -> String {
    format!("{}:verify:iss:{}", prefix, phone)
}

pub fn issuance_pattern(prefix: &str) -> String {
    format!("{}:verify:iss:*", prefix)
}

/// Sorted set member for one issuance; unique per request
pub fn issuance_member(purpose: Purpose, request_id: &str) -> String {
    format!("{}:{}", purpose.as_str(), request_id)
}

/// Purpose encoded in an issuance member
pub fn member_purpose(member: &str) -> Option<Purpose> {
    member.split_once(':').and_then(|(purpose, _)| purpose.parse().ok())
}

pub fn token_key(prefix: &str, token: &str) -> String {
    format!("{}:verify:token:{}", prefix, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(
            request_key("ssum", "01012345678", Purpose::Reset),
            "ssum:verify:req:01012345678:reset"
        );
        assert_eq!(issuance_key("ssum", "01012345678"), "ssum:verify:iss:01012345678");
        assert_eq!(token_key("ssum", "abc"), "ssum:verify:token:abc");
        assert_eq!(request_pattern("ssum"), "ssum:verify:req:*");
    }

    #[test]
    fn test_issuance_member_carries_purpose() {
        let member = issuance_member(Purpose::Signup, "4f1c");
        assert_eq!(member, "signup:4f1c");
        assert_eq!(member_purpose(&member), Some(Purpose::Signup));
        assert_eq!(member_purpose("bogus"), None);
    }
}
