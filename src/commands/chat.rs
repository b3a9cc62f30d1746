//! Scripted donor chat commands.

use rand::Rng;

use crate::chat::{ChatExchange, ChatThread};
use crate::client::MatchingService;
use crate::session::Session;

use super::CommandError;

/// Open a chat with a donor from the current results.
pub fn contact_donor<S: MatchingService>(
    session: &Session<S>,
    donor_id: &str,
) -> Result<ChatThread, CommandError> {
    let donor = session.find_donor(donor_id)?.ok_or_else(|| {
        tracing::warn!(donor_id, "Contact requested for donor outside current results");
        CommandError::UnknownDonor(donor_id.to_string())
    })?;

    let thread = ChatThread::open(&donor);
    tracing::info!(donor_id, thread_id = %thread.id, "Donor chat opened");
    session.open_chat(thread.clone())?;
    Ok(thread)
}

/// Send a message in the open chat. Blank messages yield `None`.
pub fn send_chat_message<S: MatchingService>(
    session: &Session<S>,
    message: &str,
) -> Result<Option<ChatExchange>, CommandError> {
    send_chat_message_with(session, message, &mut rand::thread_rng())
}

/// [`send_chat_message`] with a caller-supplied random source.
pub fn send_chat_message_with<S: MatchingService, R: Rng>(
    session: &Session<S>,
    message: &str,
    rng: &mut R,
) -> Result<Option<ChatExchange>, CommandError> {
    session
        .with_chat(|thread| thread.send(message, rng))?
        .ok_or(CommandError::NoActiveChat)
}
