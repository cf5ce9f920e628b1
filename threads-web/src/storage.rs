use crate::models::User;

const TOKEN_KEY: &str = "threads-token";
const USER_KEY: &str = "user-threads";

fn parse_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn parse_user(raw: &str) -> Option<User> {
    serde_json::from_str::<User>(raw).ok()
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    let window = web_sys::window().ok_or_else(|| "window is not available".to_string())?;
    window
        .local_storage()
        .map_err(|_| "failed to access localStorage".to_string())?
        .ok_or_else(|| "localStorage is not available".to_string())
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn load_token() -> Option<String> {
    let raw = local_storage().ok()?.get_item(TOKEN_KEY).ok()??;
    parse_token(&raw)
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn load_user() -> Option<User> {
    let raw = local_storage().ok()?.get_item(USER_KEY).ok()??;
    parse_user(&raw)
}

/// Stores token and user together so a reload restores the same session.
#[cfg(target_arch = "wasm32")]
pub(crate) fn save_session(token: &str, user: &User) -> Result<(), String> {
    let storage = local_storage()?;
    let raw = serde_json::to_string(user).map_err(|_| "failed to serialize user".to_string())?;

    storage
        .set_item(TOKEN_KEY, token)
        .map_err(|_| "failed to save token".to_string())?;
    storage
        .set_item(USER_KEY, &raw)
        .map_err(|_| "failed to save user".to_string())
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn save_user(user: &User) -> Result<(), String> {
    let raw = serde_json::to_string(user).map_err(|_| "failed to serialize user".to_string())?;
    local_storage()?
        .set_item(USER_KEY, &raw)
        .map_err(|_| "failed to save user".to_string())
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn clear_session() -> Result<(), String> {
    let storage = local_storage()?;
    storage
        .remove_item(TOKEN_KEY)
        .map_err(|_| "failed to clear token".to_string())?;
    storage
        .remove_item(USER_KEY)
        .map_err(|_| "failed to clear user".to_string())
}
