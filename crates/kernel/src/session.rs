//! Role selection backed by `tower-sessions`.

use serde_json::Value;
use tower_sessions::Session;

use crate::role::RoleSelector;

/// Read the stored role (async), pick the role (sync), write back if needed.
///
/// A stored value that is not a string is treated like an unknown role and
/// replaced with the default.
pub async fn resolve_session_role(
    selector: &RoleSelector,
    session: &Session,
    override_role: Option<&str>,
) -> Result<String, tower_sessions::session::Error> {
    let stored: Option<Value> = session.get(selector.session_key()).await?;
    let stored = stored.map(|value| match value {
        Value::String(s) => s,
        other => other.to_string(),
    });

    let choice = selector.choose(override_role, stored.as_deref());
    if choice.persist {
        session.insert(selector.session_key(), &choice.role).await?;
    }
    Ok(choice.role)
}
