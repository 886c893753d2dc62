use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::{error::Error as StdError, fmt};
use uuid::Uuid;

// Errors returned by session-token verification + strict claim validation.
#[derive(Debug)]
pub enum SessionJwtError {
    Jwt(jsonwebtoken::errors::Error),
    EmptyClaim(&'static str),
    InvalidSubUuid,
}

impl fmt::Display for SessionJwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::EmptyClaim(name) => write!(f, "empty '{}' claim", name),
            Self::InvalidSubUuid => write!(f, "invalid 'sub' (expected UUID)"),
        }
    }
}

impl StdError for SessionJwtError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for SessionJwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Session token (JWT) claims.
///
/// Issued at login, carried back in the `token` cookie. `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// 検証済み・アプリ側で使う型
///
/// - `sub` はプロジェクト規約として UUID なので、ここでは `Uuid` に昇格させる
/// - 署名・exp の整合性は `verify` の中で保証される前提
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub user_id: Uuid,
}

/// HS256 session-token codec (sign + verify).
///
/// - The secret comes in through the constructor, never from ambient env.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct SessionJwt {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl fmt::Debug for SessionJwt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("SessionJwt")
            .field("validation", &self.validation)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl SessionJwt {
    pub fn new(secret: &str, ttl_seconds: u64, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Sign a session token for `user_id`, expiring after the configured TTL.
    pub fn sign(&self, user_id: Uuid) -> Result<String, SessionJwtError> {
        let now = jsonwebtoken::get_current_timestamp();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?;
        Ok(token)
    }

    /// Verify signature + expiry, then strict claim validation.
    ///
    /// `jsonwebtoken::Validation` already checks the signature and `exp`; this
    /// method additionally rejects empty claims and a non-UUID subject.
    pub fn verify(&self, token: &str) -> Result<VerifiedSession, SessionJwtError> {
        let data =
            jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.sub.trim().is_empty() {
            return Err(SessionJwtError::EmptyClaim("sub"));
        }
        if claims.exp == 0 {
            return Err(SessionJwtError::EmptyClaim("exp"));
        }

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| SessionJwtError::InvalidSubUuid)?;

        Ok(VerifiedSession { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> SessionJwt {
        SessionJwt::new("0123456789abcdef0123456789abcdef", 3600, 0)
    }

    #[test]
    fn signed_token_verifies_to_the_same_user() {
        let codec = codec();
        let user_id = Uuid::new_v4();
        let token = codec.sign(user_id).unwrap();

        let session = codec.verify(&token).unwrap();
        assert_eq!(session.user_id, user_id);
    }

    #[test]
    fn token_signed_with_a_different_secret_is_rejected() {
        let token = codec().sign(Uuid::new_v4()).unwrap();
        let other = SessionJwt::new("another-secret-another-secret-xx", 3600, 0);

        assert!(matches!(
            other.verify(&token),
            Err(SessionJwtError::Jwt(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec();
        let now = jsonwebtoken::get_current_timestamp();
        let claims = SessionClaims {
            sub: Uuid::new_v4().to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"0123456789abcdef0123456789abcdef"),
        )
        .unwrap();

        assert!(codec.verify(&token).is_err());
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let codec = codec();
        let now = jsonwebtoken::get_current_timestamp();
        let claims = SessionClaims {
            sub: "not-a-uuid".into(),
            iat: now,
            exp: now + 3600,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"0123456789abcdef0123456789abcdef"),
        )
        .unwrap();

        assert!(matches!(
            codec.verify(&token),
            Err(SessionJwtError::InvalidSubUuid)
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(codec().verify("not.a.jwt").is_err());
    }
}
