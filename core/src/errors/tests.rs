//! Unit tests for domain error types

use super::*;

#[test]
fn test_verification_error_codes() {
    assert_eq!(VerificationError::NotFound.code(), "NOT_FOUND");
    assert_eq!(VerificationError::Expired.code(), "EXPIRED");
    assert_eq!(VerificationError::AttemptsExhausted.code(), "ATTEMPTS_EXHAUSTED");
    assert_eq!(
        VerificationError::Mismatch { remaining_attempts: 2 }.code(),
        "MISMATCH"
    );
    assert_eq!(
        VerificationError::RateLimited {
            reason: RateLimitReason::Cooldown,
            retry_after_seconds: Some(12),
        }
        .code(),
        "RATE_LIMITED"
    );
}

#[test]
fn test_mismatch_message_includes_remaining() {
    let error = VerificationError::Mismatch { remaining_attempts: 3 };
    assert!(error.to_string().contains('3'));
}

#[test]
fn test_domain_error_bridges() {
    let error: DomainError = AuthError::KakaoAccount.into();
    assert!(matches!(error, DomainError::Auth(AuthError::KakaoAccount)));

    let error: DomainError = VerificationError::InvalidToken.into();
    assert_eq!(error.to_string(), "Invalid or expired verification token");

    let error = DomainError::internal("connection reset");
    assert_eq!(error.to_string(), "Internal error: connection reset");
}

#[test]
fn test_rate_limit_reason_serialization() {
    assert_eq!(
        serde_json::to_string(&RateLimitReason::DailyLimit).unwrap(),
        "\"daily_limit\""
    );
}
