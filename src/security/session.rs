use crate::core::config::{SessionConfig, SESSION_KEY_LEN};
use crate::models::user::Role;
use anyhow::{anyhow, Context, Result};
use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use rand::RngCore;
use tracing::{debug, warn};

/// Who the current request belongs to, recovered from the session cookie
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub role: Role,
}

impl Identity {
    fn encode(&self) -> String {
        format!("{}:{}", self.user_id, self.role)
    }

    fn decode(value: &str) -> Option<Self> {
        let (user_id, role) = value.split_once(':')?;
        Some(Self {
            user_id: user_id.parse().ok()?,
            role: role.parse().ok()?,
        })
    }
}

/// Stateless cookie sessions: the identity travels in a single HMAC-signed cookie
pub struct SessionManager {
    key: Key,
    cookie_name: String,
}

impl SessionManager {
    pub fn new(key: Key, cookie_name: impl Into<String>) -> Self {
        Self {
            key,
            cookie_name: cookie_name.into(),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        let bytes = match &config.secret {
            Some(secret) => hex::decode(secret).context("session secret must be hex encoded")?,
            None => {
                warn!("No session secret configured, generating an ephemeral key");
                let mut bytes = vec![0u8; SESSION_KEY_LEN];
                rand::rng().fill_bytes(&mut bytes);
                bytes
            }
        };

        let key = Key::try_from(bytes.as_slice())
            .map_err(|e| anyhow!("invalid session secret: {}", e))?;

        Ok(Self::new(key, config.cookie_name.clone()))
    }

    pub fn jar(&self, headers: &HeaderMap) -> SignedCookieJar {
        SignedCookieJar::from_headers(headers, self.key.clone())
    }

    /// Identity carried by a correctly signed session cookie, if any
    pub fn identity(&self, headers: &HeaderMap) -> Option<Identity> {
        let cookie = self.jar(headers).get(&self.cookie_name)?;
        let identity = Identity::decode(cookie.value());
        if identity.is_none() {
            debug!(value = %cookie.value(), "Unparsable session cookie");
        }
        identity
    }

    pub fn login(&self, jar: SignedCookieJar, identity: Identity) -> SignedCookieJar {
        let cookie = Cookie::build((self.cookie_name.clone(), identity.encode()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        jar.add(cookie)
    }

    pub fn logout(&self, jar: SignedCookieJar) -> SignedCookieJar {
        jar.remove(Cookie::build(self.cookie_name.clone()).path("/"))
    }
}
