/// JWT token generation and validation
///
/// Tokens are signed with HS256 and carry the user identity plus a unique
/// `jti`. Two token types share one claim shape:
///
/// - **Access**: short-lived (minutes), authenticates individual requests;
///   purely stateless, validity is signature + expiry.
/// - **Refresh**: long-lived (days), exchanged for new access tokens; its
///   jti is checked against the revocation ledger on every use.
///
/// Lifetimes come from [`TokenPolicy`], which the server populates from
/// configuration.
///
/// # Example
///
/// ```
/// use quillpress_shared::auth::jwt::{create_token, validate_token, Claims, TokenPolicy, TokenType};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let policy = TokenPolicy::default();
/// let claims = Claims::new(Uuid::new_v4(), TokenType::Access, policy.access_lifetime);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!")?;
///
/// let validated = validate_token(&token, "secret-key-at-least-32-bytes-long!")?;
/// assert_eq!(validated.sub, claims.sub);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim stamped into every token
pub const ISSUER: &str = "quillpress";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to encode a token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, issuer, or structural validation failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token validated but is the wrong type for this operation
    #[error("Expected {expected} token")]
    WrongTokenType {
        /// The type the operation required
        expected: &'static str,
    },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived request credential
    Access,

    /// Long-lived credential used solely to mint access tokens
    Refresh,
}

impl TokenType {
    /// Gets token type as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Token lifetime policy
///
/// Defaults: 30-minute access tokens, 7-day refresh tokens.
#[derive(Debug, Clone, Copy)]
pub struct TokenPolicy {
    /// Lifetime of access tokens
    pub access_lifetime: Duration,

    /// Lifetime of refresh tokens
    pub refresh_lifetime: Duration,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            access_lifetime: Duration::minutes(30),
            refresh_lifetime: Duration::days(7),
        }
    }
}

/// JWT claims
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`, `nbf`, `jti`) plus the
/// token type. Every token gets a fresh random jti; only refresh-token jtis
/// ever reach the revocation ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer - always "quillpress"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Unique token ID
    pub jti: Uuid,

    /// Access or refresh
    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims for a token expiring `lifetime` from now
    pub fn new(user_id: Uuid, token_type: TokenType, lifetime: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::new_v4(),
            token_type,
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// The expiry as a timestamp, for persisting revocation entries
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }
}

/// A freshly minted access/refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Encoded access token
    pub access: String,

    /// Encoded refresh token
    pub refresh: String,
}

/// Creates a signed JWT from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT and extracts its claims
///
/// Verifies the signature, expiry, nbf, and issuer.
///
/// # Errors
///
/// Returns `JwtError::Expired` for expired tokens and
/// `JwtError::ValidationError` for everything else that fails.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates a token and checks it is an access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::WrongTokenType { expected: "access" });
    }

    Ok(claims)
}

/// Validates a token and checks it is a refresh token
///
/// Structural validation only; the revocation ledger is consulted separately
/// by [`crate::auth::revocation`].
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::WrongTokenType { expected: "refresh" });
    }

    Ok(claims)
}

/// Mints an access/refresh pair for a user
///
/// Each token gets its own fresh jti. Called at registration and login.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if either encoding fails.
pub fn issue_token_pair(
    user_id: Uuid,
    policy: &TokenPolicy,
    secret: &str,
) -> Result<TokenPair, JwtError> {
    let access_claims = Claims::new(user_id, TokenType::Access, policy.access_lifetime);
    let refresh_claims = Claims::new(user_id, TokenType::Refresh, policy.refresh_lifetime);

    Ok(TokenPair {
        access: create_token(&access_claims, secret)?,
        refresh: create_token(&refresh_claims, secret)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_policy_defaults() {
        let policy = TokenPolicy::default();
        assert_eq!(policy.access_lifetime, Duration::minutes(30));
        assert_eq!(policy.refresh_lifetime, Duration::days(7));
    }

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, TokenType::Access, Duration::minutes(30));

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_each_token_gets_fresh_jti() {
        let user_id = Uuid::new_v4();
        let a = Claims::new(user_id, TokenType::Refresh, Duration::days(7));
        let b = Claims::new(user_id, TokenType::Refresh, Duration::days(7));
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, TokenType::Access, Duration::minutes(30));
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.jti, claims.jti);
        assert_eq!(validated.token_type, TokenType::Access);
        assert_eq!(validated.iss, ISSUER);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), TokenType::Access, Duration::minutes(30));
        let token = create_token(&claims, SECRET).expect("Should create token");

        assert!(validate_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        // Expired an hour ago; jsonwebtoken's default leeway is 60 seconds
        let claims = Claims::new(Uuid::new_v4(), TokenType::Access, Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_garbage_token() {
        let result = validate_token("not-a-jwt", SECRET);
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_token_type_checks() {
        let access_claims = Claims::new(Uuid::new_v4(), TokenType::Access, Duration::minutes(30));
        let access_token = create_token(&access_claims, SECRET).unwrap();
        assert!(validate_access_token(&access_token, SECRET).is_ok());
        assert!(matches!(
            validate_refresh_token(&access_token, SECRET),
            Err(JwtError::WrongTokenType { expected: "refresh" })
        ));

        let refresh_claims = Claims::new(Uuid::new_v4(), TokenType::Refresh, Duration::days(7));
        let refresh_token = create_token(&refresh_claims, SECRET).unwrap();
        assert!(validate_refresh_token(&refresh_token, SECRET).is_ok());
        assert!(matches!(
            validate_access_token(&refresh_token, SECRET),
            Err(JwtError::WrongTokenType { expected: "access" })
        ));
    }

    #[test]
    fn test_issue_token_pair() {
        let user_id = Uuid::new_v4();
        let pair = issue_token_pair(user_id, &TokenPolicy::default(), SECRET).unwrap();

        let access = validate_access_token(&pair.access, SECRET).unwrap();
        let refresh = validate_refresh_token(&pair.refresh, SECRET).unwrap();

        assert_eq!(access.sub, user_id);
        assert_eq!(refresh.sub, user_id);
        assert_ne!(access.jti, refresh.jti);
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_expires_at_round_trips() {
        let claims = Claims::new(Uuid::new_v4(), TokenType::Refresh, Duration::days(7));
        assert_eq!(claims.expires_at().timestamp(), claims.exp);
    }
}
