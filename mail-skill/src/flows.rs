//! The session state machine: password flows and paginated mail reading.
//!
//! Every handler takes the session attributes by mutable reference and
//! returns the turn's [`ResponseModel`]. Wrong-password and wrong-invocation
//! outcomes are spoken responses that end the session; provider and store
//! failures propagate and fail the whole turn.

use futures::future::try_join_all;
use tracing::debug;

use shared::{
    generate_recovery_pin, verify_password, CredentialStore, Error, MailProvider, MessageRef,
    PendingFlow, ResponseModel, Result, SessionAttributes, SlotValues, UserInfo,
};

const PASSWORD_SLOT: &str = "password";

/// Session start with no intent: welcome and keep the session open.
pub fn launch() -> ResponseModel {
    ResponseModel::ask(
        "Welcome to SL mail skill. You can use me to check, send and manage your emails.",
        "You can say for example, whats new in my inbox to check unread messages",
    )
}

/// Unconditional polite close.
pub fn stop() -> ResponseModel {
    ResponseModel::tell("Thank you for using me. Have a nice day!")
}

/// Entry to the mail-auth flow: look up the caller's credential and, if one
/// exists, cache its hash and ask for the password.
pub async fn check_my_mail<S: CredentialStore>(
    store: &S,
    user: &UserInfo,
    attributes: &mut SessionAttributes,
) -> Result<ResponseModel> {
    match store.get(&user.user_id).await? {
        None => Ok(ResponseModel::ask(
            "You haven't set your password. You have to set a password before proceeding. \
             You can set it to any number",
            "You can say for example set my password to 1 2 3 4",
        )),
        Some(credential) => {
            attributes.flow = PendingFlow::MailAuth {
                password_hash: credential.pin,
            };
            Ok(ResponseModel::ask(
                "You need to tell your password. Whats your password?",
                "You can say for example my password is 1 2 3 4",
            ))
        }
    }
}

/// A password utterance. Which flow it resolves depends on what is pending;
/// with nothing pending it is a protocol misuse spoken back to the user.
pub async fn submit_password<S, M>(
    store: &S,
    mail: &M,
    user: &UserInfo,
    slots: &SlotValues,
    attributes: &mut SessionAttributes,
) -> Result<ResponseModel>
where
    S: CredentialStore,
    M: MailProvider,
{
    let candidate = slots.value(PASSWORD_SLOT).unwrap_or_default();

    // The pending flow is consumed either way: a correct password completes
    // it and a wrong one ends the session.
    match std::mem::take(&mut attributes.flow) {
        PendingFlow::PasswordChange {
            new_password,
            password_hash,
        } => {
            if !verify_password(candidate, &password_hash)? {
                return Ok(ResponseModel::tell("Wrong password"));
            }
            store.update(&user.user_id, &new_password).await?;
            Ok(ResponseModel::tell(format!(
                "Password updated to {new_password}"
            )))
        }
        PendingFlow::MailAuth { password_hash } => {
            let Some(token) = user.access_token.as_deref() else {
                return Ok(ResponseModel::tell("No token found"));
            };
            if !verify_password(candidate, &password_hash)? {
                return Ok(ResponseModel::tell("Wrong password"));
            }
            fetch_unread(mail, token, attributes).await
        }
        PendingFlow::None => Ok(ResponseModel::tell("Wrong invocation of intent")),
    }
}

/// Set a password. First-time users get the credential created outright;
/// existing users must confirm their current password first, so the new one
/// is stashed in the session and nothing is written yet.
pub async fn set_password<S: CredentialStore>(
    store: &S,
    user: &UserInfo,
    slots: &SlotValues,
    attributes: &mut SessionAttributes,
) -> Result<ResponseModel> {
    let Some(new_password) = slots.value(PASSWORD_SLOT) else {
        return Ok(ResponseModel::tell("Wrong invocation of intent"));
    };

    match store.get(&user.user_id).await? {
        None => {
            store.create(&user.user_id, new_password).await?;
            Ok(ResponseModel::tell(format!(
                "Successfully updated pin to \
                 <say-as interpret-as=\"digits\"> {new_password} </say-as>"
            )))
        }
        Some(credential) => {
            attributes.flow = PendingFlow::PasswordChange {
                new_password: new_password.to_string(),
                password_hash: credential.pin,
            };
            Ok(ResponseModel::ask(
                "You need to tell your current password",
                "For example you can say my password is 1 2 3 4",
            ))
        }
    }
}

/// Overwrite the credential with a random 5-digit pin, delivered on a card
/// in the companion app rather than spoken aloud.
pub async fn forgot_password<S: CredentialStore>(
    store: &S,
    user: &UserInfo,
) -> Result<ResponseModel> {
    let pin = generate_recovery_pin();
    store.update(&user.user_id, &pin.to_string()).await?;

    let mut response =
        ResponseModel::tell("We have sent a recovery pin to your alexa app. Please check it");
    response.card_title = Some("SL Mail Skill recovery password".to_string());
    response.card_content = Some(format!("Your new password is set to {pin}"));
    Ok(response)
}

/// Affirmative follow-up to the read-more offer: disclose the next page.
pub async fn continue_reading<M: MailProvider>(
    mail: &M,
    user: &UserInfo,
    attributes: &mut SessionAttributes,
) -> Result<ResponseModel> {
    let Some(page) = attributes.next_page() else {
        return Ok(ResponseModel::tell("Wrong invocation of intent"));
    };
    let Some(token) = user.access_token.as_deref() else {
        return Ok(ResponseModel::tell("No token found"));
    };
    speak_messages(mail, token, &page, attributes).await
}

/// List unread mail, start pagination, and read the first page.
async fn fetch_unread<M: MailProvider>(
    mail: &M,
    token: &str,
    attributes: &mut SessionAttributes,
) -> Result<ResponseModel> {
    let listing = mail.list_unread(token).await?;

    // An absent estimate and a zero one both fail the turn; the listing
    // contract does not distinguish "no unread mail" from a bad payload.
    let total = match listing.result_size_estimate {
        Some(n) if n > 0 => n,
        _ => {
            return Err(Error::Provider(
                "unread listing carried no size estimate".to_string(),
            ))
        }
    };

    let page = attributes.begin_pagination(listing.messages);
    debug!(total, page = page.len(), offset = attributes.offset, "reading unread mail");

    let mut response = speak_messages(mail, token, &page, attributes).await?;
    response.speech_text = format!(
        "You have {total} unread mails in your inbox. These are the latest ones. {}",
        response.speech_text
    );
    Ok(response)
}

/// Enrich a page of message refs and compose the spoken output.
///
/// All summaries are fetched concurrently and joined before responding; one
/// failure aborts the turn with no partial results. `try_join_all` yields
/// results in request order, so composition follows the slice order no
/// matter which fetch finishes first.
async fn speak_messages<M: MailProvider>(
    mail: &M,
    token: &str,
    page: &[MessageRef],
    attributes: &SessionAttributes,
) -> Result<ResponseModel> {
    let summaries = try_join_all(page.iter().map(|m| mail.fetch_summary(&m.id, token))).await?;

    let mut speech = String::new();
    for (idx, summary) in summaries.iter().enumerate() {
        speech.push_str(&format!(
            "<say-as interpret-as='ordinal'>{}</say-as> Mail is {} with subject {}. ",
            idx + 1,
            summary.from,
            summary.subject
        ));
    }

    if attributes.has_pending_pages() {
        speech.push_str("Do you want me to read more?");
        Ok(ResponseModel::ask(
            speech,
            "You can say for example yes or stop.",
        ))
    } else {
        Ok(ResponseModel::tell(speech))
    }
}
