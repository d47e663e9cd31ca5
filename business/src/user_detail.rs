use log::{debug, info};

use crate::api::UsersApi;
use crate::cache::UsersCache;
use crate::error::ApiError;
use crate::user::User;

/// Looks a user up for the detail view.
///
/// The cached collection is searched first, comparing ids by their textual
/// form so `"7"` finds a user with numeric id `7`. On a miss the server is
/// asked directly; a missing user there is [`ApiError::NotFound`].
pub async fn find_user(cache: &UsersCache, api: &UsersApi, id: &str) -> Result<User, ApiError> {
    if let Some(user) = cache
        .load()
        .and_then(|users| users.into_iter().find(|user| user.id.matches(id)))
    {
        debug!("User {id} found in cache");
        return Ok(user);
    }

    info!("User {id} not cached, fetching from server");
    api.fetch_user_by_id(id).await
}
