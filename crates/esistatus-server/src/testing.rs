//! Scripted transport double for the ESI meta client.
//!
//! Mirrors the shape of the production transport: URL glob patterns map to
//! canned JSON values or errors, and every request is recorded so tests can
//! assert on call counts.

use std::sync::RwLock;

use esistatus_core::{EsiStatusError, Result};

use crate::esi::{MetaTransport, TransportFuture};

enum Canned {
    Json(serde_json::Value),
    Error(String),
}

struct Mock {
    pattern: String,
    response: Canned,
}

/// Scripted [`MetaTransport`].
#[derive(Default)]
pub struct MockTransport {
    mocks: RwLock<Vec<Mock>>,
    requests: RwLock<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs matching `pattern` (with `*` wildcards) with a JSON value.
    pub fn mock_json(&self, pattern: &str, value: serde_json::Value) {
        self.mocks.write().unwrap().push(Mock {
            pattern: pattern.to_string(),
            response: Canned::Json(value),
        });
    }

    /// Answer URLs matching `pattern` with a request failure.
    pub fn mock_error(&self, pattern: &str, reason: &str) {
        self.mocks.write().unwrap().push(Mock {
            pattern: pattern.to_string(),
            response: Canned::Error(reason.to_string()),
        });
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.read().unwrap().clone()
    }

    /// Assert that a URL pattern was requested exactly `expected` times.
    pub fn assert_called_times(&self, pattern: &str, expected: usize) {
        let requests = self.requests();
        let matching = requests
            .iter()
            .filter(|url| matches_pattern(url, pattern))
            .count();

        assert_eq!(
            matching, expected,
            "Expected {} requests matching '{}', but found {}. Recorded: {:?}",
            expected, pattern, matching, requests
        );
    }
}

impl MetaTransport for MockTransport {
    fn get_json(&self, url: &str) -> TransportFuture<'_> {
        let url = url.to_string();

        Box::pin(async move {
            self.requests.write().unwrap().push(url.clone());

            let mocks = self.mocks.read().unwrap();

            for mock in mocks.iter() {
                if matches_pattern(&url, &mock.pattern) {
                    return match &mock.response {
                        Canned::Json(value) => Ok(value.clone()),
                        Canned::Error(reason) => Err(EsiStatusError::request_failed(&url, reason)),
                    };
                }
            }

            Err(EsiStatusError::request_failed(&url, "no mock configured"))
        })
    }
}

/// Glob match with `*` wildcards.
fn matches_pattern(url: &str, pattern: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return url == pattern;
    }

    let mut remaining = url;

    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }

        if i == 0 {
            let Some(rest) = remaining.strip_prefix(part) else {
                return false;
            };
            remaining = rest;
        } else if i == parts.len() - 1 && pattern.ends_with(part) {
            if !remaining.ends_with(part) {
                return false;
            }
        } else if let Some(pos) = remaining.find(part) {
            remaining = &remaining[pos + part.len()..];
        } else {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pattern_matching() {
        assert!(matches_pattern("https://a.test/meta/status", "*/meta/status"));
        assert!(matches_pattern(
            "https://a.test/meta/status?compatibility_date=2025-11-06",
            "*/meta/status*"
        ));
        assert!(matches_pattern("https://a.test/x", "https://a.test/x"));
        assert!(!matches_pattern("https://a.test/other", "*/meta/status"));
    }

    #[tokio::test]
    async fn test_unmocked_url_fails() {
        let transport = MockTransport::new();
        assert!(transport.get_json("https://a.test/none").await.is_err());
    }

    #[tokio::test]
    async fn test_mocked_url_answers_and_records() {
        let transport = MockTransport::new();
        transport.mock_json("*/ok", json!({"fine": true}));

        let value = transport.get_json("https://a.test/ok").await.unwrap();
        assert_eq!(value["fine"], true);
        transport.assert_called_times("*/ok", 1);
    }
}
