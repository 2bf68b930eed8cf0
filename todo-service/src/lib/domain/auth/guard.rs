//! Permission decisions for a resolved actor.
//!
//! User resources are open to the user themself and to superusers. To-dos are
//! open to their owner only; superuser status grants nothing there.

use crate::domain::auth::errors::AuthError;
use crate::domain::todo::models::Todo;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

pub fn can_access_user_resource(actor: &User, target: &UserId) -> bool {
    actor.id == *target || actor.is_superuser
}

pub fn can_access_todo(actor: &User, todo: &Todo) -> bool {
    todo.owner_id == actor.id
}

/// [`can_access_user_resource`] as a result, for handlers.
///
/// # Errors
/// * `InsufficientPrivileges` - Actor is neither the target nor a superuser
pub fn ensure_user_access(actor: &User, target: &UserId) -> Result<(), AuthError> {
    if can_access_user_resource(actor, target) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %actor.id,
            target_user_id = %target,
            "Rejected access to another user's resource"
        );
        Err(AuthError::InsufficientPrivileges)
    }
}
