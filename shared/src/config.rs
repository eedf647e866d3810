//! Configuration management for the skill Lambda.

use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Skill application id from the developer portal; events carrying a
    /// different id are rejected. Empty disables the check.
    pub application_id: String,
    /// DynamoDB table holding one hashed pin per user
    pub password_table: String,
    /// Gmail API base URL for the authenticated user's mailbox
    pub gmail_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            application_id: env::var("SKILL_APPLICATION_ID").unwrap_or_default(),
            password_table: env::var("PASSWORD_TABLE")
                .unwrap_or_else(|_| "UserPasswords".to_string()),
            gmail_base_url: env::var("GMAIL_BASE_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/gmail/v1/users/me".to_string()),
        })
    }
}
