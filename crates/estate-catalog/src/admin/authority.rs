use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AdminConfig;

/// Credentials posted by the admin login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "bearer_type")]
    pub token_type: String,
}

fn bearer_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Not authenticated")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Invalid or expired token")]
    Expired,
    #[error("token table unavailable")]
    Unavailable,
}

/// Issues and checks bearer tokens for the single admin account.
#[derive(Debug)]
pub struct AdminAuthority {
    username: String,
    password: String,
    ttl: Duration,
    tokens: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl AdminAuthority {
    pub fn new(username: impl Into<String>, password: impl Into<String>, ttl: Duration) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ttl,
            tokens: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(
            config.username.clone(),
            config.password.clone(),
            config.token_ttl(),
        )
    }

    pub fn login(&self, request: &LoginRequest) -> Result<AccessToken, AuthError> {
        self.login_at(request, Utc::now())
    }

    pub fn login_at(
        &self,
        request: &LoginRequest,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, AuthError> {
        if request.username != self.username || request.password != self.password {
            warn!(username = %request.username, "rejected admin login");
            return Err(AuthError::InvalidCredentials);
        }

        let token = uuid::Uuid::new_v4().simple().to_string();
        let mut tokens = self.tokens.lock().map_err(|_| AuthError::Unavailable)?;
        tokens.retain(|_, expires_at| *expires_at > now);
        tokens.insert(token.clone(), now + self.ttl);
        info!(username = %request.username, "admin signed in");

        Ok(AccessToken {
            access_token: token,
            token_type: bearer_type(),
        })
    }

    /// Checks an `Authorization` header value.
    pub fn authorize(&self, header: Option<&str>) -> Result<(), AuthError> {
        let token = header
            .and_then(bearer_token)
            .ok_or(AuthError::MissingToken)?;
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        let mut tokens = self.tokens.lock().map_err(|_| AuthError::Unavailable)?;
        match tokens.get(token) {
            None => Err(AuthError::InvalidToken),
            Some(expires_at) if *expires_at <= now => {
                tokens.remove(token);
                Err(AuthError::Expired)
            }
            Some(_) => Ok(()),
        }
    }
}

/// Extracts the token from a `Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority() -> AdminAuthority {
        AdminAuthority::new("admin", "admin123", Duration::minutes(30))
    }

    fn credentials(password: &str) -> LoginRequest {
        LoginRequest {
            username: "admin".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn wrong_password_is_rejected() {
        let err = authority()
            .login(&credentials("hunter2"))
            .expect_err("login should fail");
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[test]
    fn issued_token_authorizes_until_expiry() {
        let authority = authority();
        let now = Utc::now();
        let token = authority
            .login_at(&credentials("admin123"), now)
            .expect("login succeeds");
        assert_eq!(token.token_type, "bearer");

        assert!(authority
            .verify_at(&token.access_token, now + Duration::minutes(29))
            .is_ok());
        assert_eq!(
            authority.verify_at(&token.access_token, now + Duration::minutes(31)),
            Err(AuthError::Expired)
        );
        assert_eq!(
            authority.verify_at(&token.access_token, now),
            Err(AuthError::InvalidToken),
            "expired tokens are forgotten"
        );
    }

    #[test]
    fn authorize_requires_bearer_scheme() {
        let authority = authority();
        let token = authority
            .login(&credentials("admin123"))
            .expect("login succeeds")
            .access_token;

        assert_eq!(authority.authorize(None), Err(AuthError::MissingToken));
        assert_eq!(
            authority.authorize(Some(format!("Basic {token}").as_str())),
            Err(AuthError::MissingToken)
        );
        assert!(authority.authorize(Some(format!("bearer {token}").as_str())).is_ok());
        assert_eq!(
            authority.authorize(Some("Bearer nope")),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn bearer_token_trims_whitespace() {
        assert_eq!(bearer_token("Bearer  abc "), Some("abc"));
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
    }
}
