//! Shared User-Agent and Accept strings for page and icon HTTP requests.
//!
//! Single source for the mobile browser identity so page scrapes and icon
//! downloads present the same client. Sites serve different icon link sets
//! to mobile and desktop UAs; the mobile set is the one install prompts use.

/// Mobile browser User-Agent sent with page fetches and icon downloads.
pub(crate) const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 6.0.1; Nexus 5X Build/MMB29P) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Mobile Safari/537.36";

/// Accept header for icon downloads (image formats preferred, anything as fallback).
pub(crate) const ICON_ACCEPT: &str =
    "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_is_mobile() {
        assert!(
            MOBILE_USER_AGENT.contains("Mobile"),
            "UA must identify as mobile: {MOBILE_USER_AGENT}"
        );
        assert!(
            MOBILE_USER_AGENT.contains("Android"),
            "UA must identify as Android: {MOBILE_USER_AGENT}"
        );
    }

    #[test]
    fn test_accept_prefers_images() {
        assert!(ICON_ACCEPT.starts_with("image/"));
        assert!(ICON_ACCEPT.contains("image/svg+xml"));
    }
}
