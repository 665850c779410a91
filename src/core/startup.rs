use tracing::info;

use crate::core::config::Config;
use crate::models::user::User;
use crate::stores::user_store::UserStore;

/// Fixture users present when the service starts
pub fn seed_users() -> Vec<User> {
    vec![
        User::new(
            "3c8da4d5-1597-46e7-baa1-e402aed70d80",
            "sallyStudent",
            "c00d1ng1sc00l",
            "Cache Valley Stone Society",
            true,
        ),
        User::new(
            "ce20079c-2326-4f17-8ac4-f617bfd28b7f",
            "johnBlocton",
            "veryg00dpassw0rd",
            "Salt City Curling Club",
            false,
        ),
    ]
}

// this runs at boot time
pub fn build_user_store(config: &Config) -> UserStore {
    if !config.registry.seed_users {
        info!("Starting with an empty user store");
        return UserStore::new();
    }

    let seeds = seed_users();
    info!(users = seeds.len(), "Loading seed users");
    UserStore::with_users(seeds)
}
