//! Subscription filtering of inbound OSC addresses
//!
//! The filter starts out accepting everything. Subscribing narrows it to a
//! set of patterns; removing the last pattern re-enables accept-all.
//!
//! Pattern grammar, checked per pattern in this order:
//! 1. Negative substring: `base(!?excluded)` accepts addresses starting
//!    with `base` that do not contain `excluded` anywhere.
//! 2. Prefix: a trailing `*` accepts every address starting with the
//!    preceding prefix.
//! 3. Exact match otherwise.
//!
//! Acceptance is an OR across the subscribed set, so a negative pattern
//! only excludes an address when no other pattern accepts it.

use std::collections::HashSet;

/// Decides whether an inbound OSC address reaches the external sink.
#[derive(Debug, Clone)]
pub struct SubscriptionFilter {
    accept_all: bool,
    patterns: HashSet<String>,
}

impl SubscriptionFilter {
    pub fn new() -> Self {
        Self {
            accept_all: true,
            patterns: HashSet::new(),
        }
    }

    /// Add a pattern; the filter leaves accept-all mode
    pub fn subscribe(&mut self, pattern: &str) {
        self.accept_all = false;
        self.patterns.insert(pattern.to_string());
    }

    /// Remove a pattern; an empty set re-enables accept-all
    pub fn unsubscribe(&mut self, pattern: &str) {
        self.patterns.remove(pattern);
        if self.patterns.is_empty() {
            self.accept_all = true;
        }
    }

    /// Drop all patterns and accept everything again
    pub fn subscribe_all(&mut self) {
        self.patterns.clear();
        self.accept_all = true;
    }

    pub fn is_accept_all(&self) -> bool {
        self.accept_all
    }

    pub fn accepts(&self, address: &str) -> bool {
        self.accept_all
            || self
                .patterns
                .iter()
                .any(|pattern| pattern_matches(pattern, address))
    }
}

impl Default for SubscriptionFilter {
    fn default() -> Self {
        Self::new()
    }
}

fn pattern_matches(pattern: &str, address: &str) -> bool {
    if let Some((base, rest)) = pattern.split_once("(!?") {
        let excluded = rest.split(')').next().unwrap_or(rest);
        return address.starts_with(base) && !address.contains(excluded);
    }

    if let Some(prefix) = pattern.strip_suffix('*') {
        return address.starts_with(prefix);
    }

    pattern == address
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_all_by_default() {
        let filter = SubscriptionFilter::new();
        assert!(filter.accepts("/anything/at/all"));
    }

    #[test]
    fn test_exact_pattern() {
        let mut filter = SubscriptionFilter::new();
        filter.subscribe("/avatar/change");
        assert!(filter.accepts("/avatar/change"));
        assert!(!filter.accepts("/avatar/changed"));
        assert!(!filter.accepts("/other"));
    }

    #[test]
    fn test_prefix_pattern() {
        let mut filter = SubscriptionFilter::new();
        filter.subscribe("/avatar/parameters/*");
        assert!(filter.accepts("/avatar/parameters/mood"));
        assert!(filter.accepts("/avatar/parameters/deep/nested"));
        assert!(!filter.accepts("/avatar/change"));
    }

    #[test]
    fn test_negative_pattern() {
        let mut filter = SubscriptionFilter::new();
        filter.subscribe("/avatar/parameters/(!?vrcft)");
        assert!(filter.accepts("/avatar/parameters/mood"));
        assert!(!filter.accepts("/avatar/parameters/vrcft/eye"));
    }

    #[test]
    fn test_acceptance_is_or_across_patterns() {
        let mut filter = SubscriptionFilter::new();
        filter.subscribe("/avatar/parameters/*");
        filter.subscribe("/avatar/parameters/(!?vrcft)");

        assert!(filter.accepts("/avatar/parameters/mood"));
        // rejected by the negative pattern but accepted by the prefix one
        assert!(filter.accepts("/avatar/parameters/vrcft/eye"));

        filter.unsubscribe("/avatar/parameters/*");
        assert!(!filter.accepts("/avatar/parameters/vrcft/eye"));
        assert!(filter.accepts("/avatar/parameters/mood"));
    }

    #[test]
    fn test_unsubscribe_last_restores_accept_all() {
        let mut filter = SubscriptionFilter::new();
        filter.subscribe("/a");
        assert!(!filter.accepts("/b"));
        filter.unsubscribe("/a");
        assert!(filter.accepts("/b"));
    }

    #[test]
    fn test_subscribe_all() {
        let mut filter = SubscriptionFilter::new();
        filter.subscribe("/a");
        filter.subscribe("/b");
        filter.subscribe_all();
        assert!(filter.is_accept_all());
        assert!(filter.accepts("/c"));
    }
}
