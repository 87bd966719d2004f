use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockgate_core::{TenantId, UserId};

/// Staff token claims model (transport-agnostic).
///
/// The minimal set of claims the engine expects once a token has been
/// decoded/verified by whatever transport layer is in use. Session issuance
/// is an external collaborator; this crate only checks what arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffClaims {
    /// Subject / staff user identifier.
    pub sub: UserId,

    /// Tenant context for the token. Every downstream call threads this
    /// explicitly; there is no ambient tenant state.
    pub tenant_id: TenantId,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate staff claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// is intentionally outside this crate.
pub fn validate_claims(
    claims: &StaffClaims,
    now: DateTime<Utc>,
) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn claims(issued: DateTime<Utc>, expires: DateTime<Utc>) -> StaffClaims {
        StaffClaims {
            sub: UserId::new(),
            tenant_id: TenantId::new(),
            issued_at: issued,
            expires_at: expires,
        }
    }

    #[test]
    fn rejects_expired_and_future_tokens() {
        let now = Utc::now();
        let c = claims(now - Duration::hours(2), now - Duration::hours(1));
        assert_eq!(validate_claims(&c, now), Err(TokenValidationError::Expired));

        let c = claims(now + Duration::hours(1), now + Duration::hours(2));
        assert_eq!(
            validate_claims(&c, now),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn rejects_inverted_window_and_accepts_current() {
        let now = Utc::now();
        let c = claims(now, now);
        assert_eq!(
            validate_claims(&c, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );

        let c = claims(now - Duration::minutes(5), now + Duration::minutes(5));
        assert_eq!(validate_claims(&c, now), Ok(()));
    }
}
