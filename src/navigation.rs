//! Canonical-host navigation policy.
//!
//! A policy takes the current location and returns where to go instead, if
//! anywhere. The HTTP source applies the configured policy to its base URL
//! once, at build time.

use std::net::Ipv4Addr;

use reqwest::Url;

/// Maps a location to an optional redirect target.
pub type NavigationPolicy = fn(&Url) -> Option<Url>;

/// Never redirects.
pub fn no_redirect(_location: &Url) -> Option<Url> {
    None
}

/// Redirects bare DNS names to their `www.` form.
///
/// Hosts that already start with `www`, `localhost`, and IP literals are
/// left alone since prefixing them produces an invalid address. Port, path,
/// query, and fragment are preserved.
pub fn www_redirect(location: &Url) -> Option<Url> {
    let hostname = location.host_str()?;

    // IPv6 literals keep their brackets in host_str
    let is_address = hostname.starts_with('[') || hostname.parse::<Ipv4Addr>().is_ok();
    if is_address || hostname.starts_with("www") || hostname == "localhost" {
        return None;
    }

    let mut target = location.clone();
    target.set_host(Some(&format!("www.{}", hostname))).ok()?;
    Some(target)
}

/// Apply a policy, keeping the location when the policy declines.
pub fn resolve(location: Url, policy: NavigationPolicy) -> Url {
    match policy(&location) {
        Some(target) => {
            tracing::info!(from = %location, to = %target, "Redirecting to canonical host");
            target
        }
        None => location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_bare_domain_is_prefixed() {
        let target = www_redirect(&url("https://example.org:8443/stats?x=1#top")).unwrap();
        assert_eq!(target.as_str(), "https://www.example.org:8443/stats?x=1#top");
    }

    #[test]
    fn test_www_host_is_kept() {
        assert!(www_redirect(&url("https://www.example.org/")).is_none());
    }

    #[test]
    fn test_local_hosts_are_kept() {
        assert!(www_redirect(&url("http://localhost:3000/")).is_none());
        assert!(www_redirect(&url("http://127.0.0.1:3000/")).is_none());
        assert!(www_redirect(&url("http://0.0.0.0/")).is_none());
        assert!(www_redirect(&url("http://192.168.1.20:8080/")).is_none());
        assert!(www_redirect(&url("http://[::1]:8080/")).is_none());
    }

    #[test]
    fn test_no_redirect_policy() {
        assert!(no_redirect(&url("https://example.org/")).is_none());
    }

    #[test]
    fn test_resolve_applies_policy() {
        let resolved = resolve(url("https://example.org/"), www_redirect);
        assert_eq!(resolved.host_str(), Some("www.example.org"));

        let kept = resolve(url("https://example.org/"), no_redirect);
        assert_eq!(kept.host_str(), Some("example.org"));
    }
}
