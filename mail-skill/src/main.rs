//! SL Mail Skill Lambda - reads unread Gmail aloud behind a spoken pin.
//!
//! One invocation handles one conversation turn: the event is validated
//! against the configured skill id, routed by request type and intent name,
//! and the resulting speech plus updated session attributes go back to the
//! platform.

use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error as LambdaError, LambdaEvent};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use shared::{Config, DynamoCredentialStore, Error, GmailClient, Request, SkillEvent, SkillResponse};

mod dispatch;
mod flows;

use dispatch::IntentKind;

/// Clients and configuration shared across invocations.
struct AppState {
    config: Config,
    store: DynamoCredentialStore,
    mail: GmailClient,
}

impl AppState {
    async fn new() -> Result<Self, LambdaError> {
        let config = Config::from_env().map_err(|e| format!("configuration error: {e}"))?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let store = DynamoCredentialStore::new(
            aws_sdk_dynamodb::Client::new(&aws_config),
            config.password_table.clone(),
        );
        let mail = GmailClient::new(config.gmail_base_url.clone());

        Ok(Self {
            config,
            store,
            mail,
        })
    }
}

async fn handler(
    state: Arc<AppState>,
    event: LambdaEvent<SkillEvent>,
) -> Result<SkillResponse, LambdaError> {
    let event = event.payload;
    debug!(?event, "incoming event");

    if !state.config.application_id.is_empty()
        && event.session.application.application_id != state.config.application_id
    {
        return Err(Error::Protocol(format!(
            "application id mismatch: {}",
            event.session.application.application_id
        ))
        .into());
    }

    let session = event.session;
    if session.new {
        debug!(session_id = %session.session_id, "session started");
    }

    let user = session.user;
    let mut attributes = session.attributes;

    let response = match event.request {
        Request::LaunchRequest { request_id } => {
            debug!(%request_id, session_id = %session.session_id, "launch");
            flows::launch()
        }
        Request::IntentRequest { request_id, intent } => {
            debug!(%request_id, intent = %intent.name, "intent request");
            match IntentKind::from_name(&intent.name) {
                IntentKind::CheckMyMail => {
                    flows::check_my_mail(&state.store, &user, &mut attributes).await?
                }
                IntentKind::SubmitPassword => {
                    flows::submit_password(
                        &state.store,
                        &state.mail,
                        &user,
                        &intent.slots,
                        &mut attributes,
                    )
                    .await?
                }
                IntentKind::SetPassword => {
                    flows::set_password(&state.store, &user, &intent.slots, &mut attributes)
                        .await?
                }
                IntentKind::ForgotPassword => flows::forgot_password(&state.store, &user).await?,
                IntentKind::Stop => flows::stop(),
                IntentKind::Yes => {
                    flows::continue_reading(&state.mail, &user, &mut attributes).await?
                }
                IntentKind::Unknown(name) => {
                    return Err(Error::Protocol(format!("unknown intent: {name}")).into())
                }
            }
        }
        Request::SessionEndedRequest { request_id, reason } => {
            debug!(%request_id, ?reason, session_id = %session.session_id, "session ended");
            return Ok(SkillResponse::acknowledgement());
        }
    };

    let wire = response.into_response(&attributes);
    debug!(?wire, "outgoing response");
    Ok(wire)
}

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
