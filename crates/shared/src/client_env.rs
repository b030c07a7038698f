use serde::{Deserialize, Serialize};

/// Browser signatures are checked in a fixed order; the first match wins.
/// Chromium-family user agents also advertise "Safari", so Safari only
/// matches when "Chrome" is absent.
const CHROME_SIGNATURE: &str = "Chrome";
const FIREFOX_SIGNATURE: &str = "Firefox";
const SAFARI_SIGNATURE: &str = "Safari";
const EDGE_SIGNATURE: &str = "Edge";
const BRAVE_SIGNATURE: &str = "Brave";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    Windows,
    MacOs,
    Linux,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserFamily {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Brave,
    Unknown,
}

impl BrowserFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "Chrome",
            Self::Firefox => "Firefox",
            Self::Safari => "Safari",
            Self::Edge => "Edge",
            Self::Brave => "Brave",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientEnvironment {
    pub os: OsFamily,
    pub browser: BrowserFamily,
}

/// Classifies the inbound client descriptor into an OS and browser family.
///
/// The browser comes from the client's user-agent string; the OS comes from
/// the server process platform. The asymmetry is inherited behavior: history
/// store paths are resolved for the host the server runs on.
pub fn detect(user_agent: &str) -> ClientEnvironment {
    ClientEnvironment {
        os: host_os_family(),
        browser: browser_family(user_agent),
    }
}

fn host_os_family() -> OsFamily {
    match std::env::consts::OS {
        "windows" => OsFamily::Windows,
        "macos" => OsFamily::MacOs,
        "linux" => OsFamily::Linux,
        _ => OsFamily::Unknown,
    }
}

fn browser_family(user_agent: &str) -> BrowserFamily {
    if user_agent.contains(CHROME_SIGNATURE) {
        BrowserFamily::Chrome
    } else if user_agent.contains(FIREFOX_SIGNATURE) {
        BrowserFamily::Firefox
    } else if user_agent.contains(SAFARI_SIGNATURE) {
        BrowserFamily::Safari
    } else if user_agent.contains(EDGE_SIGNATURE) {
        BrowserFamily::Edge
    } else if user_agent.contains(BRAVE_SIGNATURE) {
        BrowserFamily::Brave
    } else {
        BrowserFamily::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::{BrowserFamily, browser_family};

    const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                             (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";
    const SAFARI_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 \
                             (KHTML, like Gecko) Version/17.4 Safari/605.1.15";

    #[test]
    fn chrome_wins_even_when_safari_is_present() {
        assert_eq!(browser_family(CHROME_UA), BrowserFamily::Chrome);
    }

    #[test]
    fn safari_matches_only_without_chrome() {
        assert_eq!(browser_family(SAFARI_UA), BrowserFamily::Safari);
    }

    #[test]
    fn firefox_is_detected() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0";
        assert_eq!(browser_family(ua), BrowserFamily::Firefox);
    }

    #[test]
    fn unrecognized_agent_is_unknown() {
        assert_eq!(browser_family("curl/8.5.0"), BrowserFamily::Unknown);
    }
}
