//! Browser and environment detection.
//!
//! Only the native scrollbar width changes behavior; the browser flags are
//! detected once per instance and reported for diagnostics.

use crate::constants::FALLBACK_SCROLLBAR_WIDTH;
use crate::dom::Dom;

/// Raw identification strings from the host's navigator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserAgent {
    pub user_agent: String,
    pub vendor: String,
}

impl UserAgent {
    pub fn new(user_agent: impl Into<String>, vendor: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            vendor: vendor.into(),
        }
    }
}

/// Substrings that mark a mobile browser (matched case-insensitively).
const MOBILE_MARKERS: &[&str] = &[
    "android",
    "iphone",
    "ipod",
    "iemobile",
    "blackberry",
    "bb10",
    "opera mini",
    "opera mobi",
    "windows ce",
    "windows phone",
    "symbian",
    "kindle",
    "palm",
    "fennec",
    "meego",
    "mobile",
];

/// Browser flags derived from the user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BrowserInfo {
    pub chrome: bool,
    pub edge: bool,
    pub safari: bool,
    /// Internet Explorer major version
    pub ie: Option<u8>,
    pub mobile: bool,
}

impl BrowserInfo {
    pub fn detect(agent: &UserAgent) -> Self {
        let ua = agent.user_agent.to_lowercase();
        let vendor = agent.vendor.to_lowercase();

        Self {
            chrome: ua.contains("chrome") && vendor.contains("google"),
            edge: agent.user_agent.contains("Edge"),
            safari: ua.contains("safari") && vendor.contains("apple"),
            ie: ie_version(&agent.user_agent),
            mobile: MOBILE_MARKERS.iter().any(|marker| ua.contains(marker)),
        }
    }
}

/// IE major version from `MSIE n` or `Trident/...; rv:n`.
fn ie_version(ua: &str) -> Option<u8> {
    let digits_after = |rest: &str| -> Option<u8> {
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    };

    if let Some(index) = ua.find("MSIE ") {
        return digits_after(&ua[index + "MSIE ".len()..]);
    }

    let trident = ua.find("Trident/")?;
    let rv = ua[trident..].find("rv:")?;
    digits_after(&ua[trident + rv + "rv:".len()..])
}

/// What an instance learned about its environment at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Environment {
    pub browser: BrowserInfo,
    /// Measured native scrollbar width in px; 0 for overlay scrollbars
    pub native_scrollbar_width: f64,
}

impl Environment {
    /// Probe the host, measuring the scrollbar inside `parent`.
    pub fn detect<D: Dom>(dom: &mut D, parent: D::Node) -> Self {
        let browser = BrowserInfo::detect(&dom.user_agent());
        let width = dom.native_scrollbar_width(parent);
        let native_scrollbar_width = if width.is_finite() && width > 0.0 {
            width
        } else {
            0.0
        };

        Self {
            browser,
            native_scrollbar_width,
        }
    }

    /// Whether native scrollbars take no layout space (overlay or hidden)
    pub fn has_overlay_scrollbar(&self) -> bool {
        self.native_scrollbar_width <= 0.0
    }

    /// How far the content must extend past the container edge to hide its
    /// native scrollbar. Falls back to a fixed estimate when unmeasurable.
    pub fn width_to_hide(&self) -> f64 {
        if self.has_overlay_scrollbar() {
            FALLBACK_SCROLLBAR_WIDTH
        } else {
            self.native_scrollbar_width
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const IE_10: &str = "Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.2; Trident/6.0)";
    const IE_11: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64; Trident/7.0; rv:11.0) like Gecko";
    const EDGE_LEGACY: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/70.0.3538.102 Safari/537.36 Edge/18.19582";

    #[test]
    fn test_detect_chrome_desktop() {
        let info = BrowserInfo::detect(&UserAgent::new(CHROME_DESKTOP, "Google Inc."));
        assert!(info.chrome);
        assert!(!info.safari);
        assert!(!info.edge);
        assert!(!info.mobile);
        assert_eq!(info.ie, None);
    }

    #[test]
    fn test_detect_mobile_safari() {
        let info = BrowserInfo::detect(&UserAgent::new(SAFARI_IPHONE, "Apple Computer, Inc."));
        assert!(info.safari);
        assert!(info.mobile);
        assert!(!info.chrome);
    }

    #[test]
    fn test_detect_internet_explorer() {
        let ie10 = BrowserInfo::detect(&UserAgent::new(IE_10, ""));
        assert_eq!(ie10.ie, Some(10));

        let ie11 = BrowserInfo::detect(&UserAgent::new(IE_11, ""));
        assert_eq!(ie11.ie, Some(11));
    }

    #[test]
    fn test_detect_legacy_edge() {
        let info = BrowserInfo::detect(&UserAgent::new(EDGE_LEGACY, ""));
        assert!(info.edge);
        assert!(!info.chrome);
    }

    #[test]
    fn test_width_to_hide_falls_back_for_overlay() {
        let overlay = Environment::default();
        assert!(overlay.has_overlay_scrollbar());
        assert_eq!(overlay.width_to_hide(), FALLBACK_SCROLLBAR_WIDTH);

        let classic = Environment {
            native_scrollbar_width: 17.0,
            ..Default::default()
        };
        assert!(!classic.has_overlay_scrollbar());
        assert_eq!(classic.width_to_hide(), 17.0);
    }
}
