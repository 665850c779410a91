use serde::Deserialize;

/// Body of `POST /register`
///
/// Every field is optional at the wire level; presence is checked by validation
/// so that each missing field gets its own message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub favorite_club: Option<String>,
    pub news_letter: Option<bool>,
}
