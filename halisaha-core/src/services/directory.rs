//! User directory
//!
//! A flat list of people staff can book for. Entries are never edited after
//! creation; reservations keep their own copy of the user anyway.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{NewUser, Role, User};
use crate::ports::KeyValueStore;

use super::persisted::Persisted;

/// Storage key of the user list
pub const USERS_KEY: &str = "users";

/// Directory contents on first start
pub fn default_users() -> Vec<User> {
    vec![
        NewUser::new("Mehmet", "Ak", "054322148798")
            .with_role(Role::Admin)
            .with_rating(5)
            .with_notes("Bu bir deneme notudur.")
            .into_user("1"),
        NewUser::new("Art", "Bir", "054312345670")
            .with_rating(4)
            .with_notes("Test notu")
            .into_user("2"),
    ]
}

pub struct UserDirectory {
    users: Persisted<Vec<User>>,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        Ok(Self {
            users: Persisted::load(store, USERS_KEY, default_users)?,
        })
    }

    pub fn list(&self) -> &[User] {
        self.users.get()
    }

    pub fn find(&self, id: &str) -> Option<&User> {
        self.users.get().iter().find(|u| u.id == id)
    }

    /// Case-insensitive match on full name or phone
    pub fn search(&self, query: &str) -> Vec<&User> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.users.get().iter().collect();
        }
        self.users
            .get()
            .iter()
            .filter(|u| {
                u.full_name().to_lowercase().contains(&needle) || u.phone.contains(&needle)
            })
            .collect()
    }

    /// Validate and append a user with a fresh id
    pub fn add(&mut self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;
        let user = new_user.into_user(Uuid::new_v4().to_string());
        let stored = user.clone();
        self.users.update(move |users| users.push(stored))?;
        Ok(user)
    }

    pub fn reload(&mut self) -> Result<()> {
        self.users.reload()
    }
}
