use crate::error::{SocialError, SocialResult};
use crate::{GetConfig, System, UserId};

use axum::http::header::AUTHORIZATION;
use entrait::entrait_export as entrait;
use jwt::SignWithKey;
use jwt::VerifyWithKey;
use uuid::Uuid;

const DEFAULT_SESSION_LENGTH: time::Duration = time::Duration::hours(1);

const BEARER_SCHEME: &str = "Bearer";

/// The authenticated caller, established per request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub display_name: Option<String>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct IdentityClaims {
    sub: Uuid,
    username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    /// Standard JWT `exp` claim.
    exp: i64,
}

#[entrait(pub SignIdentity, mock_api=SignIdentityMock)]
fn sign_identity(deps: &(impl System + GetConfig), identity: &Identity) -> String {
    IdentityClaims {
        sub: identity.user_id.0,
        username: identity.username.clone(),
        display_name: identity.display_name.clone(),
        exp: (deps.get_current_time() + DEFAULT_SESSION_LENGTH).unix_timestamp(),
    }
    .sign_with_key(&deps.get_jwt_keys().current)
    .expect("HMAC signing should be infallible")
}

#[entrait(pub Authenticate, mock_api=AuthenticateMock)]
fn authenticate(deps: &(impl System + GetConfig), token: Token) -> SocialResult<Identity> {
    let credential = token.credential().ok_or(SocialError::Unauthenticated)?;
    let keys = deps.get_jwt_keys();

    let claims = verify_claims(credential, &keys.current)
        .or_else(|| {
            keys.previous
                .as_ref()
                .and_then(|previous| verify_claims(credential, previous))
        })
        .ok_or(SocialError::Unauthenticated)?;

    if claims.exp <= deps.get_current_time().unix_timestamp() {
        tracing::debug!(user_id = %claims.sub, "rejecting expired token");
        return Err(SocialError::Unauthenticated);
    }

    Ok(Identity {
        user_id: UserId(claims.sub),
        username: claims.username,
        display_name: claims.display_name,
    })
}

/// Authenticate a caller who may be anonymous.
///
/// A missing token yields `None`, but a token that is present and invalid is
/// still an error.
pub fn authenticate_viewer(
    deps: &impl Authenticate,
    token: Option<Token>,
) -> SocialResult<Option<Identity>> {
    token.map(|token| deps.authenticate(token)).transpose()
}

fn verify_claims(credential: &str, key: &hmac::Hmac<sha2::Sha384>) -> Option<IdentityClaims> {
    let jwt = jwt::Token::<jwt::Header, IdentityClaims, _>::parse_unverified(credential).ok()?;
    let jwt = jwt.verify_with_key(key).ok()?;
    let (_header, claims) = jwt.into();

    Some(claims)
}

///
/// Raw value of the `Authorization` header.
///
/// The scheme is checked during authentication rather than extraction, so a
/// malformed header is rejected instead of being treated as absent.
///
#[derive(Clone, Debug)]
pub struct Token(String);

impl Token {
    pub fn none() -> Option<Token> {
        None
    }

    pub fn from_header_value(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn bearer(token: &str) -> Self {
        Self(format!("{BEARER_SCHEME} {token}"))
    }

    /// The credential part of a `Bearer` header, if the header is well formed.
    pub fn credential(&self) -> Option<&str> {
        let (scheme, credential) = self.0.trim().split_once(' ')?;
        let credential = credential.trim();

        if scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !credential.is_empty() {
            Some(credential)
        } else {
            None
        }
    }
}

#[async_trait::async_trait]
impl<S> axum::extract::FromRequestParts<S> for Token
where
    S: Send + Sync,
{
    type Rejection = SocialError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(SocialError::Unauthenticated)?;

        Ok(Token(String::from_utf8_lossy(value.as_bytes()).into_owned()))
    }
}
