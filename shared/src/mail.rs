//! Gmail client: unread-message listing and per-message summaries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// An unread message id, retained in the session for pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRef {
    pub id: String,
}

/// Spoken-facing fields extracted from a message's headers and snippet.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSummary {
    pub from: String,
    pub subject: String,
    pub date: String,
    pub snippet: String,
}

/// Result of the unread-messages query.
///
/// `result_size_estimate` is absent on malformed responses; the state
/// machine treats absent-or-zero as a provider failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadListing {
    #[serde(default)]
    pub result_size_estimate: Option<u64>,
    #[serde(default)]
    pub messages: Vec<MessageRef>,
}

/// Outbound mail API surface, behind a trait so flows can be tested with an
/// in-memory provider.
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// List unread message ids with a total-count estimate.
    async fn list_unread(&self, access_token: &str) -> Result<UnreadListing>;

    /// Fetch one message's summary fields.
    async fn fetch_summary(&self, id: &str, access_token: &str) -> Result<MessageSummary>;
}

/// Gmail REST client over the user's OAuth access token.
#[derive(Debug, Clone)]
pub struct GmailClient {
    http: reqwest::Client,
    base_url: String,
}

impl GmailClient {
    /// Create a client against the given API base, e.g.
    /// `https://www.googleapis.com/gmail/v1/users/me`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MailProvider for GmailClient {
    async fn list_unread(&self, access_token: &str) -> Result<UnreadListing> {
        let url = format!("{}/messages", self.base_url);
        debug!(%url, "listing unread messages");

        let listing = self
            .http
            .get(&url)
            .query(&[("access_token", access_token), ("q", "is:unread")])
            .send()
            .await
            .map_err(|e| Error::Provider(format!("unread listing request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Provider(format!("unread listing rejected: {e}")))?
            .json::<UnreadListing>()
            .await
            .map_err(|e| Error::Provider(format!("unread listing parse failed: {e}")))?;

        debug!(
            estimate = ?listing.result_size_estimate,
            refs = listing.messages.len(),
            "unread listing received"
        );
        Ok(listing)
    }

    async fn fetch_summary(&self, id: &str, access_token: &str) -> Result<MessageSummary> {
        let url = format!("{}/messages/{}", self.base_url, id);
        debug!(%url, "fetching message");

        let envelope = self
            .http
            .get(&url)
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| Error::Provider(format!("message {id} request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Provider(format!("message {id} rejected: {e}")))?
            .json::<MessageEnvelope>()
            .await
            .map_err(|e| Error::Provider(format!("message {id} parse failed: {e}")))?;

        envelope.into_summary(id)
    }
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    #[serde(default)]
    snippet: String,
    payload: MessagePayload,
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    headers: Vec<Header>,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

impl MessageEnvelope {
    fn into_summary(self, id: &str) -> Result<MessageSummary> {
        let header = |name: &str| {
            self.payload
                .headers
                .iter()
                .find(|h| h.name == name)
                .map(|h| h.value.clone())
                .ok_or_else(|| Error::Provider(format!("message {id} missing {name} header")))
        };

        let from = strip_address(&header("From")?);
        let subject = header("Subject")?;
        let date = header("Date")?;

        Ok(MessageSummary {
            from,
            subject,
            date,
            snippet: self.snippet,
        })
    }
}

/// Drop the `<address>` suffix from a From header, keeping the display name.
fn strip_address(from: &str) -> String {
    match from.find('<') {
        Some(idx) => from[..idx].trim_end().to_string(),
        None => from.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_address_with_brackets() {
        assert_eq!(
            strip_address("Alice Example <alice@example.com>"),
            "Alice Example"
        );
    }

    #[test]
    fn test_strip_address_without_brackets() {
        assert_eq!(strip_address("alice@example.com"), "alice@example.com");
    }

    #[test]
    fn test_strip_address_bare_bracket_pair() {
        // the match runs from the first bracket to the end
        assert_eq!(strip_address("Bob <b@x.com> via list <l@x.com>"), "Bob");
    }

    #[test]
    fn test_listing_parses_gmail_shape() {
        let json = r#"{
            "messages": [
                {"id": "18f0", "threadId": "18f0"},
                {"id": "18f1", "threadId": "18f1"}
            ],
            "resultSizeEstimate": 2
        }"#;
        let listing: UnreadListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.result_size_estimate, Some(2));
        assert_eq!(listing.messages.len(), 2);
        assert_eq!(listing.messages[0].id, "18f0");
    }

    #[test]
    fn test_listing_without_messages_key() {
        // zero unread: Gmail omits the messages array entirely
        let listing: UnreadListing = serde_json::from_str(r#"{"resultSizeEstimate": 0}"#).unwrap();
        assert_eq!(listing.result_size_estimate, Some(0));
        assert!(listing.messages.is_empty());
    }

    #[test]
    fn test_listing_without_estimate() {
        let listing: UnreadListing = serde_json::from_str(r#"{"error": "boom"}"#).unwrap();
        assert_eq!(listing.result_size_estimate, None);
    }

    fn envelope(headers: &[(&str, &str)]) -> MessageEnvelope {
        MessageEnvelope {
            snippet: "hi there".to_string(),
            payload: MessagePayload {
                headers: headers
                    .iter()
                    .map(|(name, value)| Header {
                        name: name.to_string(),
                        value: value.to_string(),
                    })
                    .collect(),
            },
        }
    }

    #[test]
    fn test_summary_extraction() {
        let summary = envelope(&[
            ("From", "Alice Example <alice@example.com>"),
            ("Subject", "Lunch?"),
            ("Date", "Fri, 28 Aug 2026 10:00:00 +0000"),
        ])
        .into_summary("m1")
        .unwrap();

        assert_eq!(summary.from, "Alice Example");
        assert_eq!(summary.subject, "Lunch?");
        assert_eq!(summary.snippet, "hi there");
    }

    #[test]
    fn test_summary_missing_header_is_provider_error() {
        let err = envelope(&[("From", "Alice <a@b>"), ("Date", "today")])
            .into_summary("m1")
            .unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert!(err.to_string().contains("Subject"));
    }
}
