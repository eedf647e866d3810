//! Inbound Alexa event envelope.
//!
//! Only the fields the skill reads are modeled; the platform sends more
//! (locale, context, timestamps) and serde ignores the rest.

use std::collections::HashMap;

use serde::Deserialize;

use crate::session::SessionAttributes;

/// One platform invocation: the session it belongs to and the request body.
#[derive(Debug, Deserialize)]
pub struct SkillEvent {
    pub session: SessionInfo,
    pub request: Request,
}

/// Session scope for the current conversation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// True on the first turn of a conversation
    #[serde(default)]
    pub new: bool,
    pub session_id: String,
    pub application: ApplicationInfo,
    /// State round-tripped by value between turns
    #[serde(default)]
    pub attributes: SessionAttributes,
    pub user: UserInfo,
}

/// Declared identity of the skill the event was routed to.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInfo {
    pub application_id: String,
}

/// The invoking user and their linked-account token, if any.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

/// The request union: launch, intent, or session teardown.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename_all = "camelCase")]
    LaunchRequest { request_id: String },
    #[serde(rename_all = "camelCase")]
    IntentRequest {
        request_id: String,
        intent: IntentPayload,
    },
    #[serde(rename_all = "camelCase")]
    SessionEndedRequest {
        request_id: String,
        #[serde(default)]
        reason: Option<String>,
    },
}

/// A resolved intent: its name and the slot values the NLU extracted.
#[derive(Debug, Deserialize)]
pub struct IntentPayload {
    pub name: String,
    #[serde(default)]
    pub slots: SlotValues,
}

/// Named slot values keyed by slot name.
#[derive(Debug, Default, Deserialize)]
pub struct SlotValues(HashMap<String, Slot>);

#[derive(Debug, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub value: Option<String>,
}

impl SlotValues {
    /// Get a slot's resolved value, if the NLU filled it.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|s| s.value.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intent_request() {
        let json = r#"{
            "session": {
                "new": false,
                "sessionId": "amzn1.echo-api.session.abc",
                "application": {"applicationId": "amzn1.ask.skill.xyz"},
                "attributes": {},
                "user": {"userId": "amzn1.ask.account.u1", "accessToken": "ya29.tok"}
            },
            "request": {
                "type": "IntentRequest",
                "requestId": "amzn1.echo-api.request.r1",
                "intent": {"name": "AuthIntent", "slots": {"password": {"value": "1234"}}}
            }
        }"#;

        let event: SkillEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.session.application.application_id, "amzn1.ask.skill.xyz");
        assert_eq!(event.session.user.access_token.as_deref(), Some("ya29.tok"));

        match event.request {
            Request::IntentRequest { intent, .. } => {
                assert_eq!(intent.name, "AuthIntent");
                assert_eq!(intent.slots.value("password"), Some("1234"));
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_parse_launch_request_without_attributes() {
        let json = r#"{
            "session": {
                "new": true,
                "sessionId": "amzn1.echo-api.session.abc",
                "application": {"applicationId": "amzn1.ask.skill.xyz"},
                "user": {"userId": "amzn1.ask.account.u1"}
            },
            "request": {"type": "LaunchRequest", "requestId": "amzn1.echo-api.request.r1"}
        }"#;

        let event: SkillEvent = serde_json::from_str(json).unwrap();
        assert!(event.session.new);
        assert!(event.session.user.access_token.is_none());
        assert!(matches!(event.request, Request::LaunchRequest { .. }));
    }

    #[test]
    fn test_missing_slot_value() {
        let json = r#"{"name": "AuthIntent", "slots": {"password": {}}}"#;
        let intent: IntentPayload = serde_json::from_str(json).unwrap();
        assert_eq!(intent.slots.value("password"), None);
        assert_eq!(intent.slots.value("nope"), None);
    }
}
