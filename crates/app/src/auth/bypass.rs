//! Paths that skip authentication.

use std::collections::HashSet;

/// Public endpoints matched exactly.
pub const DEFAULT_BYPASS_PATHS: &[&str] = &[
    "/user/send-code",
    "/user/register",
    "/user/login",
    "/user/forgot-password/send-code",
    "/user/forgot-password/reset",
    "/healthcheck",
    "/metrics",
    "/swagger",
];

/// Public path prefixes (documentation assets).
pub const DEFAULT_BYPASS_PREFIXES: &[&str] = &["/swagger/", "/api-doc/"];

/// Exact-path and prefix allow-list consulted before any credential check.
#[derive(Debug, Clone)]
pub struct BypassRules {
    exact: HashSet<String>,
    prefixes: Vec<String>,
}

impl BypassRules {
    #[must_use]
    pub fn new<P, Q>(exact: P, prefixes: Q) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        Q: IntoIterator,
        Q::Item: Into<String>,
    {
        Self {
            exact: exact.into_iter().map(Into::into).collect(),
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|prefix: &String| !prefix.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.exact.contains(path)
            || self
                .prefixes
                .iter()
                .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

impl Default for BypassRules {
    fn default() -> Self {
        Self::new(
            DEFAULT_BYPASS_PATHS.iter().copied(),
            DEFAULT_BYPASS_PREFIXES.iter().copied(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_paths_bypass() {
        let rules = BypassRules::default();

        assert!(rules.matches("/user/login"));
        assert!(rules.matches("/user/forgot-password/reset"));
    }

    #[test]
    fn exact_match_is_not_a_prefix_match() {
        let rules = BypassRules::default();

        assert!(!rules.matches("/user/login/extra"));
        assert!(!rules.matches("/user/loginx"));
        assert!(!rules.matches("/user"));
    }

    #[test]
    fn prefixes_bypass_everything_beneath() {
        let rules = BypassRules::default();

        assert!(rules.matches("/swagger/"));
        assert!(rules.matches("/swagger/index.html"));
        assert!(rules.matches("/api-doc/openapi.json"));
    }

    #[test]
    fn docs_entry_point_bypasses_without_trailing_slash() {
        let rules = BypassRules::default();

        assert!(rules.matches("/swagger"));
        assert!(!rules.matches("/swaggerx"));
    }

    #[test]
    fn protected_paths_do_not_bypass() {
        let rules = BypassRules::default();

        assert!(!rules.matches("/user/logout"));
        assert!(!rules.matches("/user/info"));
        assert!(!rules.matches("/"));
    }

    #[test]
    fn empty_prefix_is_ignored() {
        let rules = BypassRules::new(["/open"], [""]);

        assert!(rules.matches("/open"));
        assert!(!rules.matches("/closed"));
    }
}
