//! Auth gate - single fixed credential
//!
//! There is one desk login. The session is persisted so that separate CLI
//! invocations share it until `logout`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::ports::KeyValueStore;

use super::persisted::Persisted;

/// Storage key of the session
pub const SESSION_KEY: &str = "session";

const DESK_PHONE: &str = "0-532-214-87-98";
const DESK_PASSWORD: &str = "123456";

/// Message shown for a rejected login
pub const LOGIN_FAILED_MESSAGE: &str = "Numara veya şifre yanlış!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub phone: String,
    pub is_authenticated: bool,
}

pub struct AuthService {
    session: Persisted<Option<Session>>,
}

impl AuthService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        Ok(Self {
            session: Persisted::load(store, SESSION_KEY, || None)?,
        })
    }

    /// Check the credentials (trimmed) and open or clear the session
    pub fn login(&mut self, phone: &str, password: &str) -> Result<bool> {
        let phone = phone.trim();
        let accepted = phone == DESK_PHONE && password.trim() == DESK_PASSWORD;
        let session = accepted.then(|| Session {
            phone: phone.to_string(),
            is_authenticated: true,
        });
        self.session.set(session)?;
        Ok(accepted)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.session.set(None)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .get()
            .as_ref()
            .is_some_and(|s| s.is_authenticated)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.get().as_ref()
    }
}
