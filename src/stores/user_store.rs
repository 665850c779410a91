use crate::core::error::StoreError;
use crate::models::user::User;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

/// In-memory, insertion-ordered collection of users
///
/// Ids are unique across the collection. Removal keeps the order of the
/// remaining records.
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    /// Create an empty UserStore
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
        }
    }

    /// Create a store holding the given users, keeping the first of any duplicate ids
    pub fn with_users(users: Vec<User>) -> Self {
        let store = Self::new();
        for user in users {
            if let Err(e) = store.insert(user) {
                warn!(error = %e, "Skipping initial user");
            }
        }
        store
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<User>>, StoreError> {
        self.users.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<User>>, StoreError> {
        self.users.write().map_err(|_| StoreError::Poisoned)
    }

    /// Append a user
    /// Fails without modifying the store if the id is already taken
    pub fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.write()?;

        if users.iter().any(|existing| existing.id == user.id) {
            return Err(StoreError::DuplicateId(user.id));
        }

        users.push(user.clone());
        Ok(user)
    }

    /// Snapshot of every user in insertion order
    pub fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.read()?.clone())
    }

    /// Remove the user with exactly this id
    /// Returns the removed user if it existed
    pub fn remove(&self, id: &str) -> Result<Option<User>, StoreError> {
        let mut users = self.write()?;

        let index = users.iter().position(|user| user.id == id);

        Ok(index.map(|index| users.remove(index)))
    }

    #[cfg(test)]
    pub fn contains(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.read()?.iter().any(|user| user.id == id))
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_empty())
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        User::new(id, format!("user-{}", id), "abc12345", "Ogden Curling Club", false)
    }

    fn ids(store: &UserStore) -> Vec<String> {
        store.list().unwrap().into_iter().map(|u| u.id).collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = UserStore::new();
        assert!(store.is_empty().unwrap());
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn test_insert_preserves_order() {
        let store = UserStore::new();
        store.insert(user("b")).unwrap();
        store.insert(user("a")).unwrap();
        store.insert(user("c")).unwrap();

        assert_eq!(ids(&store), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let store = UserStore::new();
        store.insert(user("a")).unwrap();

        let result = store.insert(user("a"));
        assert!(matches!(result, Err(StoreError::DuplicateId(id)) if id == "a"));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_with_users_drops_duplicates() {
        let store = UserStore::with_users(vec![user("a"), user("b"), user("a")]);
        assert_eq!(ids(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let store = UserStore::with_users(vec![user("a"), user("b"), user("c")]);

        let removed = store.remove("b").unwrap();
        assert_eq!(removed.map(|u| u.id), Some("b".to_string()));
        assert_eq!(ids(&store), vec!["a", "c"]);
    }

    #[test]
    fn test_remove_missing_id() {
        let store = UserStore::with_users(vec![user("a")]);

        assert!(store.remove("z").unwrap().is_none());
        assert_eq!(ids(&store), vec!["a"]);
    }

    #[test]
    fn test_remove_requires_exact_match() {
        let store = UserStore::with_users(vec![user("abc")]);

        assert!(store.remove("ab").unwrap().is_none());
        assert!(store.remove("ABC").unwrap().is_none());
        assert!(store.contains("abc").unwrap());
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let store = UserStore::with_users(vec![user("a")]);
        let snapshot = store.list().unwrap();

        store.insert(user("b")).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len().unwrap(), 2);
    }
}
