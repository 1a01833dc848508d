//! SQS-backed event publisher.
//!
//! The SQS client is expensive to construct and needs AWS credential
//! resolution, so it is built lazily on first publish and reused for the
//! process lifetime. Missing queue configuration degrades to a logged skip so
//! the service can run without event infrastructure (e.g. local development).

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sqs::Client;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{event_payload, EventPublisher, EVENT_SIGN_IN, EVENT_SIGN_UP};

pub struct SqsEventPublisher {
    signup_queue_url: Option<String>,
    signin_queue_url: Option<String>,
    client: OnceCell<Client>,
}

impl SqsEventPublisher {
    pub fn new(signup_queue_url: Option<String>, signin_queue_url: Option<String>) -> Self {
        tracing::info!(
            signup_queue = signup_queue_url.is_some(),
            signin_queue = signin_queue_url.is_some(),
            "SQS event publisher created (client will be initialised lazily)"
        );
        Self {
            signup_queue_url,
            signin_queue_url,
            client: OnceCell::new(),
        }
    }

    /// Lazy-init the SQS client on first use.
    async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| async {
                let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
                tracing::info!("SQS client initialised");
                Client::new(&aws_config)
            })
            .await
    }

    async fn publish(&self, event: &'static str, queue_url: Option<&str>, user_id: Uuid, session_id: &str) {
        let Some(queue_url) = queue_url else {
            tracing::warn!(
                event = event,
                user_id = %user_id,
                "Event queue not configured, skipping publish"
            );
            return;
        };

        let payload = event_payload(event, user_id, session_id);
        let send = self
            .client()
            .await
            .send_message()
            .queue_url(queue_url)
            .message_body(payload);
        let session_id = session_id.to_string();

        // Fire-and-forget: the send runs on its own task and only logs its outcome.
        tokio::spawn(async move {
            match send.send().await {
                Ok(output) => {
                    tracing::info!(
                        event = event,
                        user_id = %user_id,
                        session_id = %session_id,
                        message_id = output.message_id().unwrap_or("<none>"),
                        "Event published"
                    );
                }
                Err(err) => {
                    tracing::error!(
                        error = %err,
                        event = event,
                        user_id = %user_id,
                        session_id = %session_id,
                        "Failed to publish event"
                    );
                }
            }
        });
    }
}

#[async_trait]
impl EventPublisher for SqsEventPublisher {
    async fn publish_signup(&self, user_id: Uuid, session_id: &str) {
        self.publish(
            EVENT_SIGN_UP,
            self.signup_queue_url.as_deref(),
            user_id,
            session_id,
        )
        .await;
    }

    async fn publish_signin(&self, user_id: Uuid, session_id: &str) {
        self.publish(
            EVENT_SIGN_IN,
            self.signin_queue_url.as_deref(),
            user_id,
            session_id,
        )
        .await;
    }
}
