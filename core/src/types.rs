//! Domain types shared by the client, the session and the FFI layer.
//!
//! # Design
//! `User` and `Todo` are plain data. Network access lives in `ApiClient`,
//! which takes these values as arguments, so nothing here holds a
//! connection. Field names follow the backend's JSON schema through serde
//! attributes; unknown fields in responses are ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An email address. Serialized as a bare JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Email {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A user as returned by the `/users` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: Email,
}

/// A todo item. The wire body of an update is the full item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub user_id: i64,
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

impl Todo {
    /// The item the server should hold after applying `change`.
    pub fn with_changes(&self, change: &TodoChange) -> Todo {
        Todo {
            user_id: self.user_id,
            id: self.id,
            title: change.title.clone().unwrap_or_else(|| self.title.clone()),
            completed: change.completed.unwrap_or(self.completed),
        }
    }
}

/// Change-set for a todo update. Fields left as `None` keep their current
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChange {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoChange {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo() -> Todo {
        Todo {
            user_id: 1,
            id: 7,
            title: "delectus aut autem".to_string(),
            completed: false,
        }
    }

    #[test]
    fn todo_uses_camel_case_user_id_on_the_wire() {
        let json = serde_json::to_value(todo()).unwrap();
        assert_eq!(json["userId"], 1);
        assert_eq!(json["id"], 7);
        assert_eq!(json["completed"], false);
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn user_ignores_unknown_fields() {
        let user: User = serde_json::from_str(
            r#"{"id":2,"name":"Ervin Howell","username":"Antonette",
                "email":"Shanna@melissa.tv","phone":"010-692-6593 x09125",
                "company":{"name":"Deckow-Crist"}}"#,
        )
        .unwrap();
        assert_eq!(user.id, 2);
        assert_eq!(user.email.as_str(), "Shanna@melissa.tv");
    }

    #[test]
    fn email_serializes_as_plain_string() {
        let json = serde_json::to_string(&Email::new("a@b.com")).unwrap();
        assert_eq!(json, r#""a@b.com""#);
    }

    #[test]
    fn with_changes_keeps_unchanged_fields() {
        let updated = todo().with_changes(&TodoChange::default().completed(true));
        assert_eq!(updated.title, "delectus aut autem");
        assert!(updated.completed);
        assert_eq!(updated.id, 7);
        assert_eq!(updated.user_id, 1);
    }

    #[test]
    fn with_changes_replaces_title() {
        let updated = todo().with_changes(&TodoChange::default().title("renamed"));
        assert_eq!(updated.title, "renamed");
        assert!(!updated.completed);
    }
}
