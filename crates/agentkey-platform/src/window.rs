use agentkey_common::PlatformError;

/// The window currently holding input focus.
#[derive(Debug, Clone)]
pub struct ForegroundWindow {
    pub title: String,
    pub app_name: String,
}

/// Queries the foreground window's title and application name.
pub fn foreground_window() -> Result<ForegroundWindow, PlatformError> {
    let win = active_win_pos_rs::get_active_window()
        .map_err(|_| PlatformError::WindowError("no active window".into()))?;
    Ok(ForegroundWindow {
        title: win.title,
        app_name: win.app_name,
    })
}
