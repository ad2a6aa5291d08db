//! Async remote operations: login, todo fetch, todo update.
//!
//! `ApiClient` pairs the stateless `TodoClient` with a `Transport`. It is the
//! capability a `User` or `Todo` needs to reach the backend, and is passed
//! explicitly to whatever needs it. Each call yields exactly one `Result`;
//! dropping the future before it completes abandons the call with no side
//! effects.

use crate::client::TodoClient;
use crate::config::{ClientConfig, ConfigError};
use crate::error::ApiError;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Todo, TodoChange, User};

#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    client: TodoClient,
    transport: T,
}

impl ApiClient<UreqTransport> {
    /// Client over a ureq transport with no interceptors. Fails if `config`
    /// does not validate.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            TodoClient::new(&config.base_url),
            UreqTransport::new(config),
        ))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    /// Look the user up by username.
    pub async fn login(&self, username: &str) -> Result<User, ApiError> {
        let request = self.client.build_login(username);
        let response = self.transport.execute(request).await?;
        self.client.parse_login(response)
    }

    /// The user's todos in backend order.
    pub async fn fetch_todos(&self, user: &User) -> Result<Vec<Todo>, ApiError> {
        let request = self.client.build_list_todos(user.id);
        let response = self.transport.execute(request).await?;
        self.client.parse_list_todos(response)
    }

    /// Send `change` for `todo` and return the server's copy. `todo` itself
    /// is left untouched; the returned value supersedes it.
    pub async fn update_todo(&self, todo: &Todo, change: &TodoChange) -> Result<Todo, ApiError> {
        let request = self.client.build_update_todo(todo, change)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_update_todo(response)
    }
}
