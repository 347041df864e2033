//! Bearer session tokens and signed OAuth state.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{auth::api_keys::random_hex, domain::companies::records::CompanyUuid};

/// Lifetime of an issued session token.
pub const SESSION_TTL: SignedDuration = SignedDuration::from_hours(7 * 24);

/// Lifetime of an OAuth `state` value.
pub const OAUTH_STATE_TTL: SignedDuration = SignedDuration::from_mins(10);

const OAUTH_STATE_PURPOSE: &str = "oauth_state";

const OAUTH_NONCE_BYTES: usize = 16;

#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is invalid")]
    Invalid,

    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub company_id: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    #[must_use]
    pub fn company_uuid(&self) -> CompanyUuid {
        CompanyUuid::from_uuid(self.company_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OAuthStateClaims {
    purpose: String,
    nonce: String,
    iat: i64,
    exp: i64,
}

/// HS256 signer and verifier for session tokens and OAuth state.
#[derive(Clone)]
pub struct SessionTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionTokens {
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);

        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a session token valid for [`SESSION_TTL`] from now.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue(&self, company: CompanyUuid, email: &str) -> Result<String, SessionTokenError> {
        self.issue_at(company, email, Timestamp::now())
    }

    /// Issue a session token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue_at(
        &self,
        company: CompanyUuid,
        email: &str,
        now: Timestamp,
    ) -> Result<String, SessionTokenError> {
        let claims = SessionClaims {
            company_id: company.into_uuid(),
            email: email.to_string(),
            iat: now.as_second(),
            exp: now.as_second() + SESSION_TTL.as_secs(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(SessionTokenError::Signing)
    }

    /// Verify a session token and return its claims.
    ///
    /// # Errors
    ///
    /// [`SessionTokenError::Expired`] once the expiry has passed, [`SessionTokenError::Invalid`]
    /// for anything else.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(classify)
    }

    /// Issue a short-lived signed `state` value for the OAuth redirect.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue_oauth_state(&self) -> Result<String, SessionTokenError> {
        self.issue_oauth_state_at(Timestamp::now())
    }

    fn issue_oauth_state_at(&self, now: Timestamp) -> Result<String, SessionTokenError> {
        let claims = OAuthStateClaims {
            purpose: OAUTH_STATE_PURPOSE.to_string(),
            nonce: random_hex::<OAUTH_NONCE_BYTES>(),
            iat: now.as_second(),
            exp: now.as_second() + OAUTH_STATE_TTL.as_secs(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(SessionTokenError::Signing)
    }

    /// Check a `state` value returned by the OAuth provider.
    ///
    /// # Errors
    ///
    /// Returns an error for forged, stale, or non-state tokens.
    pub fn verify_oauth_state(&self, state: &str) -> Result<(), SessionTokenError> {
        let claims = decode::<OAuthStateClaims>(state, &self.decoding, &self.validation)
            .map_err(classify)?
            .claims;

        if claims.purpose != OAUTH_STATE_PURPOSE {
            return Err(SessionTokenError::Invalid);
        }

        Ok(())
    }
}

impl Debug for SessionTokens {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("SessionTokens(**redacted**)")
    }
}

fn classify(error: jsonwebtoken::errors::Error) -> SessionTokenError {
    match error.kind() {
        ErrorKind::ExpiredSignature => SessionTokenError::Expired,
        _ => SessionTokenError::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn tokens() -> SessionTokens {
        SessionTokens::new(b"test-signing-secret")
    }

    #[test]
    fn verify_returns_issued_claims() -> TestResult {
        let tokens = tokens();
        let company = CompanyUuid::new();
        let now = Timestamp::now();

        let token = tokens.issue_at(company, "a@x.com", now)?;
        let claims = tokens.verify(&token)?;

        assert_eq!(claims.company_uuid(), company);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.iat, now.as_second());
        assert_eq!(claims.exp - claims.iat, SESSION_TTL.as_secs());

        Ok(())
    }

    #[test]
    fn token_issued_beyond_ttl_is_expired() -> TestResult {
        let tokens = tokens();
        let issued_at = Timestamp::now() - SESSION_TTL - SignedDuration::from_secs(1);

        let token = tokens.issue_at(CompanyUuid::new(), "a@x.com", issued_at)?;

        assert!(matches!(
            tokens.verify(&token),
            Err(SessionTokenError::Expired)
        ));

        Ok(())
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() -> TestResult {
        let token = SessionTokens::new(b"other-secret").issue(CompanyUuid::new(), "a@x.com")?;

        assert!(matches!(
            tokens().verify(&token),
            Err(SessionTokenError::Invalid)
        ));

        Ok(())
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(
            tokens().verify("not.a.jwt"),
            Err(SessionTokenError::Invalid)
        ));
    }

    #[test]
    fn oauth_state_round_trips_and_is_not_a_session() -> TestResult {
        let tokens = tokens();

        let state = tokens.issue_oauth_state()?;

        tokens.verify_oauth_state(&state)?;

        assert!(tokens.verify(&state).is_err());

        Ok(())
    }

    #[test]
    fn session_token_is_not_an_oauth_state() -> TestResult {
        let tokens = tokens();

        let session = tokens.issue(CompanyUuid::new(), "a@x.com")?;

        assert!(tokens.verify_oauth_state(&session).is_err());

        Ok(())
    }

    #[test]
    fn stale_oauth_state_is_expired() -> TestResult {
        let tokens = tokens();
        let issued_at = Timestamp::now() - OAUTH_STATE_TTL - SignedDuration::from_secs(1);

        let state = tokens.issue_oauth_state_at(issued_at)?;

        assert!(matches!(
            tokens.verify_oauth_state(&state),
            Err(SessionTokenError::Expired)
        ));

        Ok(())
    }
}
