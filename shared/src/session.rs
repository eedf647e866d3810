//! Session-attribute state carried between conversation turns.
//!
//! The platform round-trips these attributes by value: they are echoed back
//! in every response that keeps the session open and delivered again with the
//! next request. Nothing else survives between turns.

use serde::{Deserialize, Serialize};

use crate::mail::MessageRef;

/// Messages disclosed per turn.
pub const MAX_READ: usize = 3;

/// Upper bound on message refs retained in the session for pagination.
pub const MAX_KEPT: usize = 20;

/// Which multi-turn flow, if any, is waiting on the user's next utterance.
///
/// At most one flow is pending at a time; the union makes that structural.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PendingFlow {
    /// No flow open; a bare password utterance is a protocol misuse
    #[default]
    None,
    /// Waiting for the password that unlocks mail reading
    #[serde(rename_all = "camelCase")]
    MailAuth { password_hash: String },
    /// Waiting for the current password before committing a new one
    #[serde(rename_all = "camelCase")]
    PasswordChange {
        new_password: String,
        password_hash: String,
    },
}

/// The cross-turn state: the pending flow plus pagination bookkeeping.
///
/// Invariant: `offset <= messages.len()`, and `offset == 0` means no further
/// pages are pending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionAttributes {
    pub flow: PendingFlow,
    pub messages: Vec<MessageRef>,
    pub offset: usize,
}

impl SessionAttributes {
    /// Start paginating over a fresh unread listing.
    ///
    /// Returns the slice to disclose this turn. When the listing exceeds
    /// [`MAX_READ`], up to [`MAX_KEPT`] refs are retained for later pages and
    /// `offset` marks how many have been handed out; otherwise nothing is
    /// retained and `offset` stays 0.
    pub fn begin_pagination(&mut self, mut refs: Vec<MessageRef>) -> Vec<MessageRef> {
        if refs.len() > MAX_READ {
            refs.truncate(MAX_KEPT);
            let immediate = refs[..MAX_READ].to_vec();
            self.messages = refs;
            self.offset = MAX_READ;
            immediate
        } else {
            self.messages.clear();
            self.offset = 0;
            refs
        }
    }

    /// Take the next pending page, advancing `offset`.
    ///
    /// Returns `None` when no pagination is in progress. The last page resets
    /// `offset` to 0. The attributes arrive from the wire unvalidated, so an
    /// offset past the end of `messages` is treated as nothing pending.
    pub fn next_page(&mut self) -> Option<Vec<MessageRef>> {
        if self.offset == 0 {
            return None;
        }
        let remaining = match self.messages.get(self.offset..) {
            Some(r) if !r.is_empty() => r,
            _ => {
                self.offset = 0;
                return None;
            }
        };
        if remaining.len() > MAX_READ {
            let page = remaining[..MAX_READ].to_vec();
            self.offset += MAX_READ;
            Some(page)
        } else {
            let page = remaining.to_vec();
            self.offset = 0;
            Some(page)
        }
    }

    /// True while a "read more?" offer is outstanding.
    pub fn has_pending_pages(&self) -> bool {
        self.offset > 0 && !self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(n: usize) -> Vec<MessageRef> {
        (0..n)
            .map(|i| MessageRef {
                id: format!("m{i}"),
            })
            .collect()
    }

    #[test]
    fn test_small_listing_is_not_retained() {
        let mut attrs = SessionAttributes::default();
        let page = attrs.begin_pagination(refs(2));
        assert_eq!(page.len(), 2);
        assert_eq!(attrs.offset, 0);
        assert!(attrs.messages.is_empty());
        assert!(!attrs.has_pending_pages());
    }

    #[test]
    fn test_exact_max_read_is_not_retained() {
        let mut attrs = SessionAttributes::default();
        let page = attrs.begin_pagination(refs(MAX_READ));
        assert_eq!(page.len(), MAX_READ);
        assert_eq!(attrs.offset, 0);
    }

    #[test]
    fn test_large_listing_capped_and_offset_set() {
        let mut attrs = SessionAttributes::default();
        let page = attrs.begin_pagination(refs(25));
        assert_eq!(page.len(), MAX_READ);
        assert_eq!(attrs.messages.len(), MAX_KEPT);
        assert_eq!(attrs.offset, MAX_READ);
        assert!(attrs.has_pending_pages());
    }

    #[test]
    fn test_next_page_without_pagination() {
        let mut attrs = SessionAttributes::default();
        assert!(attrs.next_page().is_none());
    }

    #[test]
    fn test_drain_in_fixed_chunks() {
        let mut attrs = SessionAttributes::default();
        let first = attrs.begin_pagination(refs(5));
        assert_eq!(first.len(), 3);
        assert_eq!(attrs.offset, 3);

        let second = attrs.next_page().unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].id, "m3");
        assert_eq!(attrs.offset, 0);
        assert!(attrs.next_page().is_none());
    }

    #[test]
    fn test_drain_capped_listing_fully() {
        let mut attrs = SessionAttributes::default();
        let mut seen = attrs.begin_pagination(refs(25)).len();
        while let Some(page) = attrs.next_page() {
            assert!(page.len() <= MAX_READ);
            seen += page.len();
        }
        assert_eq!(seen, MAX_KEPT);
        assert_eq!(attrs.offset, 0);
    }

    #[test]
    fn test_offset_never_exceeds_messages() {
        for n in 0..30 {
            let mut attrs = SessionAttributes::default();
            attrs.begin_pagination(refs(n));
            assert!(attrs.offset <= attrs.messages.len());
            while attrs.next_page().is_some() {
                assert!(attrs.offset <= attrs.messages.len());
            }
        }
    }

    #[test]
    fn test_offset_beyond_messages_is_nothing_pending() {
        // stale or forged wire state: offset points past the retained refs
        let mut attrs: SessionAttributes =
            serde_json::from_str(r#"{"messages": [{"id": "m0"}], "offset": 5}"#).unwrap();
        assert!(attrs.next_page().is_none());
        assert_eq!(attrs.offset, 0);
    }

    #[test]
    fn test_offset_at_end_of_messages_is_nothing_pending() {
        let mut attrs = SessionAttributes {
            messages: refs(3),
            offset: 3,
            ..Default::default()
        };
        assert!(attrs.next_page().is_none());
        assert_eq!(attrs.offset, 0);
    }

    #[test]
    fn test_offset_without_messages_is_nothing_pending() {
        let mut attrs = SessionAttributes {
            offset: 2,
            ..Default::default()
        };
        assert!(attrs.next_page().is_none());
        assert_eq!(attrs.offset, 0);
    }

    #[test]
    fn test_flow_wire_round_trip() {
        let attrs = SessionAttributes {
            flow: PendingFlow::PasswordChange {
                new_password: "4321".to_string(),
                password_hash: "$argon2id$stub".to_string(),
            },
            messages: vec![MessageRef {
                id: "m0".to_string(),
            }],
            offset: 1,
        };

        let wire = serde_json::to_value(&attrs).unwrap();
        assert_eq!(wire["flow"]["state"], "passwordChange");
        let back: SessionAttributes = serde_json::from_value(wire).unwrap();
        assert_eq!(back, attrs);
    }

    #[test]
    fn test_empty_attributes_default() {
        let attrs: SessionAttributes = serde_json::from_str("{}").unwrap();
        assert_eq!(attrs.flow, PendingFlow::None);
        assert!(attrs.messages.is_empty());
        assert_eq!(attrs.offset, 0);
    }
}
