//! Shared library for the SL Mail voice skill Lambda.
//!
//! This crate provides the Alexa event and response models, the Gmail and
//! credential-store clients, and the password hashing utilities used by the
//! skill's intent handlers.

pub mod config;
pub mod error;
pub mod event;
pub mod mail;
pub mod password;
pub mod response;
pub mod session;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use event::{Request, SessionInfo, SkillEvent, SlotValues, UserInfo};
pub use mail::{GmailClient, MailProvider, MessageRef, MessageSummary, UnreadListing};
pub use password::{generate_recovery_pin, hash_password, verify_password};
pub use response::{ResponseModel, SkillResponse};
pub use session::{PendingFlow, SessionAttributes, MAX_KEPT, MAX_READ};
pub use store::{Credential, CredentialStore, DynamoCredentialStore};
