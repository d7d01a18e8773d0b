//! Locator → profile dispatch.
//!
//! Scans profiles in registration order and returns the first whose matcher
//! accepts the locator. No match is a routing signal ("no engine
//! available"), not an error.

use tracing::{debug, info};
use url::Url;

use newsreel_common::{ContentLocator, SourceProfile};

pub struct Dispatcher {
    profiles: Vec<SourceProfile>,
}

impl Dispatcher {
    pub fn new(profiles: Vec<SourceProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[SourceProfile] {
        &self.profiles
    }

    /// First matching profile in registration order, or None.
    pub fn dispatch(&self, locator: &ContentLocator) -> Option<&SourceProfile> {
        for profile in &self.profiles {
            if matches(profile, locator) {
                info!(%locator, profile = profile.name, "Dispatched");
                return Some(profile);
            }
        }
        debug!(%locator, "No engine available");
        None
    }
}

fn matches(profile: &SourceProfile, locator: &ContentLocator) -> bool {
    if locator.is_http() {
        let Ok(url) = Url::parse(locator.as_str()) else {
            return false;
        };
        let Some(host) = url.host_str() else {
            return false;
        };
        if !profile.domains.iter().any(|d| domain_matches(host, d)) {
            return false;
        }

        // Structurally valid but deliberately excluded pages (live-updates
        // aggregations): the domain matches, yet the page has no stable,
        // extractable content. An entry-id query parameter pins one
        // specific entry and lifts the exclusion.
        let has_entry_param = url.query_pairs().any(|(k, _)| {
            let key = k.to_ascii_lowercase();
            profile.entry_params.iter().any(|p| key == *p)
        });
        if has_entry_param {
            return true;
        }

        let path = url.path().to_ascii_lowercase();
        !profile
            .excluded_patterns
            .iter()
            .any(|pattern| path.contains(pattern))
    } else {
        let lower = locator.as_str().to_ascii_lowercase();
        profile.schemes.iter().any(|s| lower.starts_with(s))
    }
}

/// Suffix match on dot boundaries: `edition.example.com` matches
/// `example.com`, `notexample.com` does not.
fn domain_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::default_profiles;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(default_profiles())
    }

    #[test]
    fn url_dispatches_to_matching_profile() {
        let d = dispatcher();
        let profile = d
            .dispatch(&ContentLocator::new(
                "https://www.politico.com/news/2026/08/20/budget-vote",
            ))
            .expect("politico URL should dispatch");
        assert_eq!(profile.name, "politico");
    }

    #[test]
    fn unknown_domain_is_a_miss() {
        let d = dispatcher();
        assert!(d
            .dispatch(&ContentLocator::new("https://example.org/story"))
            .is_none());
    }

    #[test]
    fn domain_match_is_suffix_not_substring() {
        let d = dispatcher();
        assert!(d
            .dispatch(&ContentLocator::new("https://notpolitico.com/a"))
            .is_none());
        assert!(d
            .dispatch(&ContentLocator::new("https://fakepolitico.com.evil.net/a"))
            .is_none());
    }

    #[test]
    fn live_updates_without_entry_id_is_a_miss() {
        let d = dispatcher();
        assert!(d
            .dispatch(&ContentLocator::new(
                "https://abcnews.go.com/US/live-updates/hurricane-landfall"
            ))
            .is_none());
    }

    #[test]
    fn live_updates_with_entry_id_dispatches() {
        let d = dispatcher();
        let profile = d
            .dispatch(&ContentLocator::new(
                "https://abcnews.go.com/US/live-updates/hurricane-landfall?entryId=12345",
            ))
            .expect("entryId pins a specific entry");
        assert_eq!(profile.name, "abcnews");
    }

    #[test]
    fn entry_id_param_name_is_case_insensitive() {
        let d = dispatcher();
        assert!(d
            .dispatch(&ContentLocator::new(
                "https://abcnews.go.com/US/live-updates/storm?entryid=9"
            ))
            .is_some());
    }

    #[test]
    fn native_scheme_dispatches_to_platform_relay() {
        let d = dispatcher();
        let profile = d
            .dispatch(&ContentLocator::new("telegram://post/42"))
            .expect("native locator should dispatch");
        assert_eq!(profile.name, "telegram-post");

        let alt = d
            .dispatch(&ContentLocator::new("tg://post/42"))
            .expect("alternate scheme should dispatch");
        assert_eq!(alt.name, "telegram-post");
    }

    #[test]
    fn unregistered_scheme_is_a_miss() {
        let d = dispatcher();
        assert!(d.dispatch(&ContentLocator::new("signal://post/42")).is_none());
    }
}
