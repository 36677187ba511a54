use std::{collections::HashMap, sync::Arc};

use super::user::{User, UserId};

/// Session-local users keyed by id. Never evicts.
///
/// The map sits behind an `Arc` and is never mutated in place: inserting
/// yields a new cache, so any snapshot handed out earlier stays as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserCache {
    users: Arc<HashMap<UserId, User>>,
}

impl UserCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.users.contains_key(&id)
    }

    #[must_use]
    pub fn with_user(&self, id: UserId, user: User) -> Self {
        let mut users = HashMap::clone(&self.users);
        users.insert(id, user);
        Self {
            users: Arc::new(users),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
