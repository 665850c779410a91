use serde::{Deserialize, Serialize};

/// Clubs a registrant is expected to pick from.
///
/// Registration accepts any non-empty club name; this list is informational.
pub const FAVORITE_CLUBS: [&str; 5] = [
    "Cache Valley Stone Society",
    "Ogden Curling Club",
    "Park City Curling Club",
    "Salt City Curling Club",
    "Utah Olympic Oval Curling Club",
];

/// A registered curling fan
///
/// The password is stored and returned as submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Service-generated unique identifier
    pub id: String,
    pub username: String,
    pub password: String,
    pub favorite_club: String,
    /// Whether the user wants to receive newsletters
    pub news_letter: bool,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        favorite_club: impl Into<String>,
        news_letter: bool,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            password: password.into(),
            favorite_club: favorite_club.into(),
            news_letter,
        }
    }

    /// Resource path of this user
    pub fn location(&self) -> String {
        format!("/user/{}", self.id)
    }
}
