//! Signed, time-limited tokens.
//!
//! A token is `base64url(payload).base64url(hmac)`, with the purpose tag
//! mixed into the MAC so a session token can never pass as a reset token.
//! Nothing is persisted server-side for pending resets; the token itself
//! is the whole state.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Reset links die an hour after issuance.
pub const RESET_TOKEN_MAX_AGE_SECS: i64 = 3600;

/// Sessions last a day; clients re-login after that.
pub const SESSION_MAX_AGE_SECS: i64 = 86_400;

const RESET_PURPOSE: &str = "password-reset";
const SESSION_PURPOSE: &str = "session";

#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    email: String,
    iat: i64,
}

/// Verified content of a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id.
    pub sub: i32,
    pub role: String,
    pub iat: i64,
}

/// HMAC-SHA256 signer shared by reset and session tokens.
#[derive(Clone)]
pub struct TokenSigner {
    key: Vec<u8>,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self, purpose: &str, payload: &[u8]) -> HmacSha256 {
        // HMAC accepts keys of any length, so this cannot fail.
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("hmac accepts keys of any length");
        mac.update(purpose.as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac
    }

    fn seal(&self, purpose: &str, payload: &[u8]) -> String {
        let signature = self.mac(purpose, payload).finalize().into_bytes();
        format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode(signature)
        )
    }

    /// Splits, decodes and MAC-checks a token. Every failure mode maps to
    /// `TokenInvalid`; expiry is checked by the callers because only they
    /// know the validity window.
    fn open(&self, purpose: &str, token: &str) -> Result<Vec<u8>, AuthError> {
        let (payload_b64, signature_b64) =
            token.split_once('.').ok_or(AuthError::TokenInvalid)?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthError::TokenInvalid)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthError::TokenInvalid)?;

        // Constant-time comparison via the Mac trait.
        self.mac(purpose, &payload)
            .verify_slice(&signature)
            .map_err(|_| AuthError::TokenInvalid)?;
        Ok(payload)
    }

    pub fn issue_reset_token(&self, email: &str, issued_at: DateTime<Utc>) -> String {
        let claims = ResetClaims {
            email: email.trim().to_lowercase(),
            iat: issued_at.timestamp(),
        };
        let payload = serde_json::to_vec(&claims).expect("claims serialize to json");
        self.seal(RESET_PURPOSE, &payload)
    }

    /// Returns the embedded email when the token is genuine and inside its
    /// validity window. `TokenExpired` and `TokenInvalid` stay distinct
    /// here; the presentation layer collapses them for end users.
    pub fn verify_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let payload = self.open(RESET_PURPOSE, token)?;
        let claims: ResetClaims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::TokenInvalid)?;
        if now.timestamp() - claims.iat > RESET_TOKEN_MAX_AGE_SECS {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims.email)
    }

    pub fn issue_session(&self, user_id: i32, role: &str, issued_at: DateTime<Utc>) -> String {
        let claims = SessionClaims {
            sub: user_id,
            role: role.to_string(),
            iat: issued_at.timestamp(),
        };
        let payload = serde_json::to_vec(&claims).expect("claims serialize to json");
        self.seal(SESSION_PURPOSE, &payload)
    }

    pub fn verify_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, AuthError> {
        let payload = self.open(SESSION_PURPOSE, token)?;
        let claims: SessionClaims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::TokenInvalid)?;
        if now.timestamp() - claims.iat > SESSION_MAX_AGE_SECS {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn signer() -> TokenSigner {
        TokenSigner::new("unit-test-secret")
    }

    fn issue_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn reset_token_round_trip() {
        let signer = signer();
        let token = signer.issue_reset_token("Dana@Example.EDU", issue_time());
        let email = signer
            .verify_reset_token(&token, issue_time() + chrono::Duration::seconds(30))
            .unwrap();
        assert_eq!(email, "dana@example.edu");
    }

    #[test]
    fn reset_token_expires_after_one_hour() {
        let signer = signer();
        let token = signer.issue_reset_token("dana@example.edu", issue_time());

        // Still valid at exactly the window edge
        let at_edge = issue_time() + chrono::Duration::seconds(3600);
        assert!(signer.verify_reset_token(&token, at_edge).is_ok());

        // One second past the window: expired, not invalid
        let past = issue_time() + chrono::Duration::seconds(3601);
        let err = signer.verify_reset_token(&token, past).unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn mutated_token_is_invalid_not_expired() {
        let signer = signer();
        let token = signer.issue_reset_token("dana@example.edu", issue_time());

        // Flip one character somewhere in the payload section
        let mut chars: Vec<char> = token.chars().collect();
        let idx = 3;
        chars[idx] = if chars[idx] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        let err = signer
            .verify_reset_token(&tampered, issue_time())
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
    }

    #[test]
    fn purposes_do_not_cross() {
        let signer = signer();
        let session = signer.issue_session(7, "student", issue_time());
        let err = signer.verify_reset_token(&session, issue_time()).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
    }

    #[test]
    fn different_secret_rejects() {
        let token = signer().issue_reset_token("dana@example.edu", issue_time());
        let other = TokenSigner::new("a-different-secret");
        let err = other.verify_reset_token(&token, issue_time()).unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
    }

    #[test]
    fn session_round_trip_carries_identity() {
        let signer = signer();
        let token = signer.issue_session(42, "teacher", issue_time());
        let claims = signer
            .verify_session(&token, issue_time() + chrono::Duration::hours(1))
            .unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "teacher");
    }

    #[test]
    fn session_expires_after_a_day() {
        let signer = signer();
        let token = signer.issue_session(42, "teacher", issue_time());
        let err = signer
            .verify_session(&token, issue_time() + chrono::Duration::seconds(86_401))
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }
}
