//! Plain-text rendering of the users view.

use chrono::SecondsFormat;

use super::ViewState;
use crate::domain::User;

/// Render a view state as text, one line per user when loaded.
pub fn render(state: &ViewState) -> String {
    match state {
        ViewState::Idle => "users not requested".to_owned(),
        ViewState::Loading => "loading users...".to_owned(),
        ViewState::Loaded(users) => users.iter().map(render_user).collect::<Vec<_>>().join("\n"),
        ViewState::Empty => "no users found".to_owned(),
        ViewState::Failed(error) => {
            format!("could not load users [{}]: {}", error.code(), error.message())
        }
    }
}

fn render_user(user: &User) -> String {
    format!(
        "#{id} {name} (joined {joined}, updated {updated})",
        id = user.id(),
        name = user.full_name(),
        joined = user.created_at().to_rfc3339_opts(SecondsFormat::Secs, true),
        updated = user.updated_at().to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}
