//! Platform glue: opening external links and locating the API.

use tracing::warn;

/// Open a URL in the default browser
#[cfg(not(target_arch = "wasm32"))]
pub fn open_url(url: &str) {
    #[cfg(target_os = "windows")]
    let spawned = std::process::Command::new("cmd")
        .args(["/C", "start", "", url])
        .spawn();

    #[cfg(target_os = "macos")]
    let spawned = std::process::Command::new("open").arg(url).spawn();

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let spawned = std::process::Command::new("xdg-open").arg(url).spawn();

    if let Err(e) = spawned {
        warn!(url, error = %e, "could not open browser");
    }
}

/// Open a URL in a new tab
#[cfg(target_arch = "wasm32")]
pub fn open_url(url: &str) {
    let opened = web_sys::window().map(|w| w.open_with_url_and_target(url, "_blank"));
    if !matches!(opened, Some(Ok(_))) {
        warn!(url, "could not open new tab");
    }
}

/// Default API base when no configuration names one
#[cfg(not(target_arch = "wasm32"))]
pub fn default_api_base() -> Option<String> {
    None
}

/// The API served next to the page: `{origin}/api/`
#[cfg(target_arch = "wasm32")]
pub fn default_api_base() -> Option<String> {
    let origin = web_sys::window()?.location().origin().ok()?;
    Some(format!("{origin}/api/"))
}
