//! Blocking client for the CauseHive REST API.

use super::{SuggestError, Suggestion, SuggestionKind, SuggestionSource};
use causehive_core::config::ApiConfig;
use causehive_core::model::cause::{Cause, normalize_causes};
use serde_json::Value;

/// Characters of a cause description kept in a suggestion.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 60;

const SEARCH_PATH: &str = "/api/causes/search/";
const LIST_PATH: &str = "/api/causes/list/";

/// HTTP client configured once at startup from [`ApiConfig`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout())
            .user_agent(concat!("causehive/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: config.normalized_base_url(),
            token: config.token.clone(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search the cause index and shape the hits as dropdown entries.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestError`] on transport failure, a non-2xx status, or a
    /// body that is not JSON.
    pub fn search_suggestions(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Suggestion>, SuggestError> {
        let limit_param = limit.to_string();
        let body = self.get_json(SEARCH_PATH, &[("q", query), ("limit", &limit_param)])?;
        let mut suggestions = suggestions_from_response(&body);
        suggestions.truncate(limit);
        tracing::debug!(query, count = suggestions.len(), "fetched suggestions");
        Ok(suggestions)
    }

    /// One page of the public cause list, normalized.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestError`] when the request or decoding fails.
    pub fn fetch_causes(&self, page: u32) -> Result<Vec<Cause>, SuggestError> {
        let page_param = page.to_string();
        let body = self.get_json(LIST_PATH, &[("page", &page_param)])?;
        Ok(normalize_causes(body))
    }

    fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, SuggestError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self
            .agent
            .get(&url)
            .set("Accept", "application/json");
        for (name, value) in query {
            request = request.query(name, value);
        }
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                return Err(SuggestError::Status { url, status });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(SuggestError::Transport {
                    url,
                    message: transport.to_string(),
                });
            }
        };

        response
            .into_json::<Value>()
            .map_err(|source| SuggestError::Decode { url, source })
    }
}

impl SuggestionSource for ApiClient {
    fn suggest(&self, query: &str, limit: usize) -> Result<Vec<Suggestion>, SuggestError> {
        self.search_suggestions(query, limit)
    }
}

/// Map a `{"results": [...]}` search response to cause suggestions.
///
/// Anything other than an object with a `results` array yields no entries.
#[must_use]
pub fn suggestions_from_response(body: &Value) -> Vec<Suggestion> {
    let Some(results) = body.get("results").and_then(Value::as_array) else {
        return Vec::new();
    };
    results.iter().filter_map(cause_suggestion).collect()
}

fn cause_suggestion(hit: &Value) -> Option<Suggestion> {
    let hit = hit.as_object()?;
    let text = |key: &str| {
        hit.get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    };

    let title = text("name").or_else(|| text("title")).unwrap_or_default();
    let description = text("description").map_or_else(String::new, preview);
    let id = hit.get("id").and_then(|id| match id {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    });
    let url = id.as_ref().map(|id| format!("/causes/{id}"));

    Some(Suggestion {
        kind: SuggestionKind::Cause,
        title: title.to_string(),
        description,
        id,
        url,
        text: None,
    })
}

fn preview(description: &str) -> String {
    let mut short: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    short.push_str("...");
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_search_hits_to_cause_suggestions() {
        let body = json!({
            "results": [
                {"id": 12, "name": "Clean Water for Tamale",
                 "description": "Boreholes for four communities in the Northern Region before the dry season"},
                {"id": "c-9", "title": "School Roofing", "description": ""},
                "garbage"
            ]
        });
        let found = suggestions_from_response(&body);
        assert_eq!(found.len(), 2);

        assert_eq!(found[0].kind, SuggestionKind::Cause);
        assert_eq!(found[0].title, "Clean Water for Tamale");
        assert_eq!(
            found[0].description,
            "Boreholes for four communities in the Northern Region before...",
        );
        assert_eq!(found[0].id.as_deref(), Some("12"));
        assert_eq!(found[0].url.as_deref(), Some("/causes/12"));

        assert_eq!(found[1].title, "School Roofing");
        assert!(found[1].description.is_empty());
        assert_eq!(found[1].url.as_deref(), Some("/causes/c-9"));
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let long = "₵".repeat(70);
        let short = preview(&long);
        assert_eq!(short.chars().count(), DESCRIPTION_PREVIEW_CHARS + 3);
    }

    #[test]
    fn missing_results_is_empty() {
        assert!(suggestions_from_response(&json!([])).is_empty());
        assert!(suggestions_from_response(&json!({"detail": "nope"})).is_empty());
    }

    #[test]
    fn client_uses_normalized_base_url() {
        let config = ApiConfig {
            base_url: "http://localhost:8000/api/".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(ApiClient::new(&config).base_url(), "http://localhost:8000");
    }

    #[test]
    #[ignore = "needs a local socket; run with --ignored"]
    fn unreachable_host_is_a_transport_error() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_ms: 500,
            ..ApiConfig::default()
        };
        let err = ApiClient::new(&config)
            .suggest("water", 8)
            .expect_err("nothing listens on the discard port");
        assert!(matches!(err, SuggestError::Transport { .. }));
    }
}
