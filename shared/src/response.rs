//! Outbound response model and wire-format builder.

use serde::Serialize;

use crate::session::SessionAttributes;

/// Per-turn response the intent handlers fill in. Not persisted.
#[derive(Debug, Clone)]
pub struct ResponseModel {
    pub speech_text: String,
    pub reprompt_text: String,
    /// When set, speech is wrapped in `<speak>` and sent as SSML
    pub ssml: bool,
    pub should_end_session: bool,
    pub card_title: Option<String>,
    pub card_content: Option<String>,
    pub image_url: Option<String>,
}

impl Default for ResponseModel {
    fn default() -> Self {
        Self {
            speech_text: String::new(),
            reprompt_text: String::new(),
            ssml: true,
            should_end_session: true,
            card_title: None,
            card_content: None,
            image_url: None,
        }
    }
}

impl ResponseModel {
    /// A closing response: speak and end the session.
    pub fn tell(speech: impl Into<String>) -> Self {
        Self {
            speech_text: speech.into(),
            ..Self::default()
        }
    }

    /// A prompting response: speak, reprompt, and keep the session open.
    pub fn ask(speech: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Self {
            speech_text: speech.into(),
            reprompt_text: reprompt.into(),
            should_end_session: false,
            ..Self::default()
        }
    }

    /// Convert into the platform wire response.
    ///
    /// Session attributes are echoed only while the session stays open; the
    /// platform discards them on a closed session anyway.
    pub fn into_response(self, attributes: &SessionAttributes) -> SkillResponse {
        let card = self.card_title.map(|title| {
            let content = self.card_content.unwrap_or_default();
            match self.image_url {
                Some(url) => Card::Standard {
                    title,
                    text: content,
                    image: CardImage {
                        small_image_url: url.clone(),
                        large_image_url: url,
                    },
                },
                None => Card::Simple { title, content },
            }
        });

        let reprompt = if self.reprompt_text.is_empty() {
            None
        } else {
            Some(Reprompt {
                output_speech: speech_object(&self.reprompt_text, self.ssml),
            })
        };

        SkillResponse {
            version: "1.0".to_string(),
            response: ResponseBody {
                output_speech: Some(speech_object(&self.speech_text, self.ssml)),
                should_end_session: self.should_end_session,
                reprompt,
                card,
            },
            session_attributes: if self.should_end_session {
                None
            } else {
                Some(attributes.clone())
            },
        }
    }
}

fn speech_object(text: &str, ssml: bool) -> OutputSpeech {
    if ssml {
        OutputSpeech::Ssml {
            ssml: format!("<speak>{text}</speak>"),
        }
    } else {
        OutputSpeech::PlainText {
            text: text.to_string(),
        }
    }
}

/// Top-level wire response.
#[derive(Debug, Serialize)]
pub struct SkillResponse {
    pub version: String,
    pub response: ResponseBody,
    #[serde(rename = "sessionAttributes", skip_serializing_if = "Option::is_none")]
    pub session_attributes: Option<SessionAttributes>,
}

impl SkillResponse {
    /// Bare acknowledgement for `SessionEndedRequest`: no speech, no state.
    pub fn acknowledgement() -> Self {
        Self {
            version: "1.0".to_string(),
            response: ResponseBody {
                output_speech: None,
                should_end_session: true,
                reprompt: None,
                card: None,
            },
            session_attributes: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    pub should_end_session: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    #[serde(rename = "SSML")]
    Ssml { ssml: String },
    PlainText { text: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// Visual supplement shown in the companion app. Simple unless an image is
/// attached, in which case the platform requires the Standard shape.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Card {
    Simple { title: String, content: String },
    #[serde(rename_all = "camelCase")]
    Standard {
        title: String,
        text: String,
        image: CardImage,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardImage {
    pub small_image_url: String,
    pub large_image_url: String,
}
