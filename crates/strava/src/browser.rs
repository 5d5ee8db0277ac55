use std::env;

use url::Url;

pub const NO_BROWSER_VAR: &str = "STRAVA_NO_BROWSER";

/// Whether opening the system browser is likely to reach the user.
pub fn browser_available() -> bool {
    detect(|key| env::var_os(key).is_some())
}

fn detect<F>(is_set: F) -> bool
where
    F: Fn(&str) -> bool,
{
    if is_set(NO_BROWSER_VAR) {
        return false;
    }

    if is_set("SSH_CONNECTION") && !is_set("DISPLAY") {
        return false;
    }

    if is_set("DISPLAY") || is_set("WAYLAND_DISPLAY") {
        return true;
    }

    cfg!(target_os = "windows") || cfg!(target_os = "macos")
}

/// Open the page in the system browser; failure only costs a log line.
pub fn launch(url: &Url) {
    match open::that(url.as_str()) {
        Ok(()) => tracing::info!(%url, "opened browser"),
        Err(err) => tracing::warn!(%url, error = %err, "failed to launch system browser"),
    }
}
