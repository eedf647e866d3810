//! Credential store: one hashed pin per user, kept in DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::{types::AttributeValue, Client as DynamoClient};
use tracing::debug;

use crate::password::hash_password;
use crate::{Error, Result};

/// A stored credential record.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub user_id: String,
    /// PHC-format argon2 hash; plaintext never persists
    pub pin: String,
}

/// Credential persistence surface, behind a trait so flows can be tested
/// with an in-memory store.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the user's credential, `None` if they never set one.
    async fn get(&self, user_id: &str) -> Result<Option<Credential>>;

    /// Hash and persist a first-time password.
    async fn create(&self, user_id: &str, password: &str) -> Result<()>;

    /// Hash and overwrite the stored pin. Acts as an upsert; callers only
    /// invoke it on known-existing users.
    async fn update(&self, user_id: &str, password: &str) -> Result<()>;
}

/// DynamoDB-backed store over a table keyed by `userId` with a `pin`
/// attribute.
#[derive(Debug, Clone)]
pub struct DynamoCredentialStore {
    client: DynamoClient,
    table: String,
}

impl DynamoCredentialStore {
    pub fn new(client: DynamoClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl CredentialStore for DynamoCredentialStore {
    async fn get(&self, user_id: &str) -> Result<Option<Credential>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("userId", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| Error::Store(format!("failed to read credential: {e}")))?;

        let Some(item) = response.item() else {
            debug!(user_id, "no credential record");
            return Ok(None);
        };

        let pin = item
            .get("pin")
            .and_then(|v| v.as_s().ok())
            .ok_or_else(|| Error::Store("credential record has no pin attribute".to_string()))?;

        Ok(Some(Credential {
            user_id: user_id.to_string(),
            pin: pin.clone(),
        }))
    }

    async fn create(&self, user_id: &str, password: &str) -> Result<()> {
        let hashed = hash_password(password)?;
        self.client
            .put_item()
            .table_name(&self.table)
            .item("userId", AttributeValue::S(user_id.to_string()))
            .item("pin", AttributeValue::S(hashed))
            .send()
            .await
            .map_err(|e| Error::Store(format!("failed to create credential: {e}")))?;

        debug!(user_id, "credential created");
        Ok(())
    }

    async fn update(&self, user_id: &str, password: &str) -> Result<()> {
        let hashed = hash_password(password)?;
        self.client
            .update_item()
            .table_name(&self.table)
            .key("userId", AttributeValue::S(user_id.to_string()))
            .update_expression("SET pin = :p")
            .expression_attribute_values(":p", AttributeValue::S(hashed))
            .send()
            .await
            .map_err(|e| Error::Store(format!("failed to update credential: {e}")))?;

        debug!(user_id, "credential updated");
        Ok(())
    }
}
