use crate::core::error::{RegistrationError, StoreError};
use crate::models::registration::RegisterRequest;
use crate::models::user::{User, FAVORITE_CLUBS};
use crate::stores::user_store::UserStore;
use crate::validation::registration::ValidatedRegistration;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Create, list and delete registered users
///
/// The store is injected so every service instance (and every test) owns its own
/// collection.
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<UserStore>,
}

impl RegistrationService {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<UserStore> {
        &self.store
    }

    /// Validate the request and append a new user with a freshly generated id
    pub fn create(&self, request: RegisterRequest) -> Result<User, RegistrationError> {
        let registration = request.validate()?;

        // Unknown clubs are accepted
        if !FAVORITE_CLUBS.contains(&registration.favorite_club.as_str()) {
            debug!(favorite_club = %registration.favorite_club, "Favorite club not in the known list");
        }

        loop {
            let user = build_user(Uuid::new_v4(), registration.clone());

            match self.store.insert(user) {
                Ok(user) => {
                    info!(
                        user_id = %user.id,
                        username = %user.username,
                        favorite_club = %user.favorite_club,
                        news_letter = user.news_letter,
                        "User registered"
                    );
                    return Ok(user);
                }
                Err(StoreError::DuplicateId(id)) => {
                    warn!(user_id = %id, "Generated user id already taken, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Every user in insertion order
    pub fn list(&self) -> Result<Vec<User>, RegistrationError> {
        let users = self.store.list()?;
        debug!(users = users.len(), "Listed users");
        Ok(users)
    }

    /// Remove the user with this id
    pub fn delete(&self, id: &str) -> Result<(), RegistrationError> {
        match self.store.remove(id)? {
            Some(user) => {
                info!(user_id = %user.id, username = %user.username, "User deleted");
                Ok(())
            }
            None => {
                debug!(user_id = %id, "Delete requested for unknown user");
                Err(RegistrationError::NotFound)
            }
        }
    }
}

fn build_user(id: Uuid, registration: ValidatedRegistration) -> User {
    User::new(
        id.to_string(),
        registration.username,
        registration.password,
        registration.favorite_club,
        registration.news_letter,
    )
}
