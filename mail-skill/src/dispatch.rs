//! Intent-name dispatch.
//!
//! The interaction model's intent names map onto a fixed enum so the handler
//! match is exhaustive; anything the model does not declare lands in
//! `Unknown` and fails the turn.

/// The intents the skill's interaction model declares.
#[derive(Debug, Clone, PartialEq)]
pub enum IntentKind {
    /// "whats new in my inbox": starts the mail-auth flow
    CheckMyMail,
    /// "my password is 1 2 3 4": resolves whichever flow is pending
    SubmitPassword,
    /// "set my password to 1 2 3 4"
    SetPassword,
    /// "i forgot my password"
    ForgotPassword,
    Stop,
    /// affirmative follow-up to the read-more offer
    Yes,
    Unknown(String),
}

impl IntentKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "CheckMyMailIntent" => Self::CheckMyMail,
            "AuthIntent" => Self::SubmitPassword,
            "SetPasswordIntent" => Self::SetPassword,
            "ForgotPasswordIntent" => Self::ForgotPassword,
            "AMAZON.StopIntent" => Self::Stop,
            "AMAZON.YesIntent" => Self::Yes,
            other => Self::Unknown(other.to_string()),
        }
    }
}
