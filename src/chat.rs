//! Scripted donor chat.
//!
//! There is no messaging backend: contacting a donor opens a thread seeded
//! with a greeting, and every message the requester sends is answered with a
//! canned reply drawn at random from a fixed table. The page is told how long
//! to "type" before showing the reply, and when the exchange is long enough to
//! count as a confirmed request.

use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Donor;

/// First donor message in every thread.
pub const GREETING: &str = "Hello! I received your emergency request. I'm available to donate.";

/// Donor replies. `{lastDonation}` is replaced with the donor's last donation.
pub const CANNED_REPLIES: [&str; 7] = [
    GREETING,
    "Yes, I can come to the hospital within 30 minutes.",
    "My last donation was {lastDonation}. I'm healthy and ready to help.",
    "Please share the hospital address and I'll head there immediately.",
    "Is the patient stable? I'm praying for them.",
    "I've donated before. I understand the urgency of rare blood types.",
    "On my way to the hospital now. ETA 25 minutes.",
];

const LAST_DONATION_PLACEHOLDER: &str = "{lastDonation}";

/// Suggested delay before a reply is shown, in milliseconds.
pub const REPLY_DELAY_MS: Range<u64> = 1000..3000;

/// Thread length at which the request counts as confirmed.
pub const CONFIRMATION_THRESHOLD: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Donor,
    Requester,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    /// Donor display name; `None` for requester messages.
    pub author: Option<String>,
    pub text: String,
    /// RFC 3339.
    pub sent_at: String,
}

impl ChatMessage {
    fn now(sender: Sender, author: Option<String>, text: String) -> Self {
        Self {
            sender,
            author,
            text,
            sent_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// One requester message and the scripted answer to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub thread_id: String,
    pub sent: ChatMessage,
    pub reply: ChatMessage,
    pub reply_delay_ms: u64,
    pub request_confirmed: bool,
}

/// Conversation with one donor from the latest results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatThread {
    pub id: String,
    pub donor_id: String,
    pub donor_name: String,
    last_donation: String,
    pub messages: Vec<ChatMessage>,
    pub request_confirmed: bool,
}

impl ChatThread {
    /// Open a thread with `donor`, starting with the greeting.
    pub fn open(donor: &Donor) -> Self {
        let greeting = ChatMessage::now(
            Sender::Donor,
            Some(donor.display_name.clone()),
            GREETING.to_string(),
        );
        Self {
            id: Uuid::new_v4().to_string(),
            donor_id: donor.id.clone(),
            donor_name: donor.display_name.clone(),
            last_donation: donor.last_donation.clone(),
            messages: vec![greeting],
            request_confirmed: false,
        }
    }

    /// Record a requester message and script the donor's answer.
    ///
    /// Blank text is ignored and returns `None`.
    pub fn send<R: Rng>(&mut self, text: &str, rng: &mut R) -> Option<ChatExchange> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let sent = ChatMessage::now(Sender::Requester, None, text.to_string());
        let reply = ChatMessage::now(
            Sender::Donor,
            Some(self.donor_name.clone()),
            canned_reply(rng, &self.last_donation),
        );
        let reply_delay_ms = rng.gen_range(REPLY_DELAY_MS);

        self.messages.push(sent.clone());
        self.messages.push(reply.clone());
        if self.messages.len() >= CONFIRMATION_THRESHOLD && !self.request_confirmed {
            self.request_confirmed = true;
            tracing::info!(thread_id = %self.id, donor_id = %self.donor_id, "Donation request confirmed");
        }

        Some(ChatExchange {
            thread_id: self.id.clone(),
            sent,
            reply,
            reply_delay_ms,
            request_confirmed: self.request_confirmed,
        })
    }
}

/// Pick a reply from [`CANNED_REPLIES`] and fill in the last donation.
pub fn canned_reply<R: Rng>(rng: &mut R, last_donation: &str) -> String {
    let template = CANNED_REPLIES[rng.gen_range(0..CANNED_REPLIES.len())];
    template.replace(LAST_DONATION_PLACEHOLDER, last_donation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn donor() -> Donor {
        Donor {
            id: "D9".into(),
            display_name: Donor::display_name_for("D9"),
            blood_type: "Bombay(Oh)".into(),
            location: "Dadar".into(),
            coordinates: GeoPoint { lat: 19.0, lon: 72.8 },
            confidence_percent: 88,
            distance_km: 4.2,
            score: 0.88,
            phone: "+91 XXXXX XXXXX".into(),
            availability: "Available".into(),
            last_donation: "3 months ago".into(),
        }
    }

    #[test]
    fn thread_opens_with_greeting() {
        let thread = ChatThread::open(&donor());
        assert_eq!(thread.messages.len(), 1);
        assert_eq!(thread.messages[0].text, GREETING);
        assert_eq!(thread.messages[0].author.as_deref(), Some("Donor D9"));
        assert!(!thread.request_confirmed);
        assert!(Uuid::parse_str(&thread.id).is_ok());
    }

    #[test]
    fn blank_message_is_ignored() {
        let mut thread = ChatThread::open(&donor());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(thread.send("   ", &mut rng).is_none());
        assert_eq!(thread.messages.len(), 1);
    }

    #[test]
    fn reply_comes_from_table_with_substitution() {
        let allowed: Vec<String> = CANNED_REPLIES
            .iter()
            .map(|r| r.replace("{lastDonation}", "3 months ago"))
            .collect();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let mut thread = ChatThread::open(&donor());
            let exchange = thread.send("Can you come?", &mut rng).unwrap();
            assert!(allowed.contains(&exchange.reply.text), "{}", exchange.reply.text);
            assert!(!exchange.reply.text.contains("{lastDonation}"));
            assert!(REPLY_DELAY_MS.contains(&exchange.reply_delay_ms));
            assert_eq!(exchange.sent.text, "Can you come?");
            assert_eq!(exchange.sent.sender, Sender::Requester);
        }
    }

    #[test]
    fn second_exchange_confirms_request() {
        let mut thread = ChatThread::open(&donor());
        let mut rng = StdRng::seed_from_u64(7);

        let first = thread.send("Hi", &mut rng).unwrap();
        assert_eq!(thread.messages.len(), 3);
        assert!(!first.request_confirmed);

        let second = thread.send(" Please hurry ", &mut rng).unwrap();
        assert_eq!(thread.messages.len(), 5);
        assert!(second.request_confirmed);
        assert_eq!(second.sent.text, "Please hurry");
        assert_eq!(second.thread_id, thread.id);
    }

    #[test]
    fn placeholder_substitution() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let reply = canned_reply(&mut rng, "Recently");
            assert!(!reply.contains('{'));
        }
    }
}
