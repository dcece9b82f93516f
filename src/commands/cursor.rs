use tauri::{command, State};

use crate::error::NinError;
use crate::host::HostState;
use crate::nin::Direction;

/// Feedback text the webview shows after a successful move.
pub const CURSOR_MOVED_FEEDBACK: &str = "カーソルを移動しました";

/// Move the system pointer one step, independent of the current mode.
#[command]
pub async fn move_cursor(host: State<'_, HostState>, direction: Direction) -> Result<String, NinError> {
    host.keyboard.move_cursor(direction).await?;
    log::info!("[NIN] move_cursor({:?})", direction);
    Ok(CURSOR_MOVED_FEEDBACK.to_string())
}
