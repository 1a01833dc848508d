//! Asynchronous notification events for sign-up and sign-in.
//!
//! Publishing is strictly fire-and-forget: at-most-once delivery, the outcome
//! is only ever logged and never propagated to the caller.

pub mod sqs;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

pub use sqs::SqsEventPublisher;

/// Event types carried in the payload `event` field.
pub const EVENT_SIGN_UP: &str = "sign_up";
pub const EVENT_SIGN_IN: &str = "sign_in";

/// Publisher of lifecycle events. Implementations must never fail the caller:
/// publish errors are logged and swallowed.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Fire-and-forget publish of a sign-up event.
    async fn publish_signup(&self, user_id: Uuid, session_id: &str);

    /// Fire-and-forget publish of a sign-in event.
    async fn publish_signin(&self, user_id: Uuid, session_id: &str);
}

/// Build the JSON payload shared by both event types.
pub(crate) fn event_payload(event: &str, user_id: Uuid, session_id: &str) -> String {
    serde_json::json!({
        "event": event,
        "user_id": user_id.to_string(),
        "session_id": session_id,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    })
    .to_string()
}
