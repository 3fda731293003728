/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength validation
/// - [`jwt`]: JWT token pair generation and validation
/// - [`revocation`]: Refresh-token revocation (blacklist) flow
/// - [`middleware`]: Axum middleware extracting the authenticated user
/// - [`authorization`]: Pure ownership-based access checks
///
/// # Token lifecycle
///
/// Registration and login mint an access/refresh pair. The access token
/// (minutes-scale lifetime) authenticates requests statelessly; the refresh
/// token (days-scale) mints replacement access tokens until it expires or is
/// revoked. Revocation records the refresh token's jti in a persisted
/// ledger consulted on every refresh; the refresh token itself is never
/// rotated.
///
/// # Example
///
/// ```no_run
/// use quillpress_shared::auth::jwt::{issue_token_pair, TokenPolicy};
/// use quillpress_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let pair = issue_token_pair(Uuid::new_v4(), &TokenPolicy::default(), "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod revocation;
