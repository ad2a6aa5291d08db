//! Snapshot encoding for the signed-in user.
//!
//! The snapshot is a JSON object with exactly `id`, `name`, `username` and
//! `email`. It carries no network handle: a restored `User` regains its
//! remote capability simply by being passed to the application's
//! `ApiClient`.

use crate::types::User;

#[derive(Debug, Clone, Copy, Default)]
pub struct UserSerializer;

impl UserSerializer {
    pub fn serialize(&self, user: &User) -> Result<String, serde_json::Error> {
        serde_json::to_string(user)
    }

    pub fn deserialize(&self, snapshot: &str) -> Result<User, serde_json::Error> {
        serde_json::from_str(snapshot)
    }
}
