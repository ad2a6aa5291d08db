//! Sign-in and sign-out flows tying remote calls to the session.
//!
//! The session is only touched after the remote call has completed, so a
//! flow whose future is dropped mid-flight leaves it unchanged.

use log::{error, info};

use crate::api::ApiClient;
use crate::board::TodoBoard;
use crate::error::ApiError;
use crate::session::{Session, SessionError};
use crate::storage::KeyValueStorage;
use crate::transport::Transport;
use crate::types::User;

/// Log in and make the user current.
///
/// A session write failure is reported as `Unexpected`; the session then
/// keeps its previous user.
pub async fn sign_in<T: Transport, S: KeyValueStorage>(
    api: &ApiClient<T>,
    session: &mut Session<S>,
    username: &str,
) -> Result<User, ApiError> {
    let user = api.login(username).await?;
    session.begin(user.clone()).map_err(|e| {
        error!("could not persist session: {e}");
        ApiError::Unexpected(e.to_string())
    })?;
    Ok(user)
}

pub fn sign_out<S: KeyValueStorage>(session: &mut Session<S>) -> Result<(), SessionError> {
    session.end()?;
    info!("signed out");
    Ok(())
}

/// Fetch the current user's todos. `Ok(None)` when nobody is signed in.
pub async fn load_board<T: Transport, S: KeyValueStorage>(
    api: &ApiClient<T>,
    session: &Session<S>,
) -> Result<Option<TodoBoard>, ApiError> {
    let Some(user) = session.current_user() else {
        return Ok(None);
    };
    let todos = api.fetch_todos(user).await?;
    Ok(Some(TodoBoard::new(todos)))
}
