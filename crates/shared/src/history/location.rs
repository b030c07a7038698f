use std::path::PathBuf;

use crate::client_env::{BrowserFamily, ClientEnvironment, OsFamily};

/// On-disk schema family of a browser's history store. Chromium-family
/// stores share one layout; Safari has its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Chromium,
    Safari,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStoreLocation {
    pub path: PathBuf,
    pub kind: StoreKind,
}

/// Maps an (OS, browser) pair to the vendor's default history store
/// location under the user profile. Returns `None` for combinations with
/// no known Chromium- or Safari-schema store (Firefox on any OS, Safari
/// off macOS). Existence is not checked here.
pub fn resolve_store_location(env: &ClientEnvironment) -> Option<HistoryStoreLocation> {
    let (segments, kind) = profile_relative_store(env)?;
    let mut path = dirs::home_dir()?;
    for segment in segments {
        path.push(segment);
    }
    Some(HistoryStoreLocation { path, kind })
}

fn profile_relative_store(
    env: &ClientEnvironment,
) -> Option<(&'static [&'static str], StoreKind)> {
    use BrowserFamily::{Brave, Chrome, Edge, Safari};
    use OsFamily::{Linux, MacOs, Windows};

    let entry: (&[&str], StoreKind) = match (env.os, env.browser) {
        (Windows, Chrome) => (
            &["AppData", "Local", "Google", "Chrome", "User Data", "Default", "History"],
            StoreKind::Chromium,
        ),
        (Windows, Edge) => (
            &["AppData", "Local", "Microsoft", "Edge", "User Data", "Default", "History"],
            StoreKind::Chromium,
        ),
        (Windows, Brave) => (
            &[
                "AppData",
                "Local",
                "BraveSoftware",
                "Brave-Browser",
                "User Data",
                "Default",
                "History",
            ],
            StoreKind::Chromium,
        ),
        (MacOs, Chrome) => (
            &["Library", "Application Support", "Google", "Chrome", "Default", "History"],
            StoreKind::Chromium,
        ),
        (MacOs, Edge) => (
            &["Library", "Application Support", "Microsoft Edge", "Default", "History"],
            StoreKind::Chromium,
        ),
        (MacOs, Brave) => (
            &[
                "Library",
                "Application Support",
                "BraveSoftware",
                "Brave-Browser",
                "Default",
                "History",
            ],
            StoreKind::Chromium,
        ),
        (MacOs, Safari) => (&["Library", "Safari", "History.db"], StoreKind::Safari),
        (Linux, Chrome) => (
            &[".config", "google-chrome", "Default", "History"],
            StoreKind::Chromium,
        ),
        (Linux, Edge) => (
            &[".config", "microsoft-edge", "Default", "History"],
            StoreKind::Chromium,
        ),
        (Linux, Brave) => (
            &[".config", "BraveSoftware", "Brave-Browser", "Default", "History"],
            StoreKind::Chromium,
        ),
        _ => return None,
    };

    Some(entry)
}
