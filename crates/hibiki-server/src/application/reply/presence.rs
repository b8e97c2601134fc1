//! Side-effect emitter
//!
//! Read receipts, typing indicators, reply delivery and failure notices.
//! Realtime publishing is best-effort: publisher errors are logged and
//! never fail the orchestration. The read watermark is best-effort too;
//! persisting the reply is not.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use hibiki::{
    DomainError, Message, MessageStore, NotificationEvent, NotificationPublisher,
    REPLY_FAILED_NOTICE,
};

#[derive(Clone)]
pub struct PresenceEmitter {
    store: Arc<dyn MessageStore>,
    publisher: Arc<dyn NotificationPublisher>,
    typing_timeout_secs: u64,
}

impl PresenceEmitter {
    pub fn new(
        store: Arc<dyn MessageStore>,
        publisher: Arc<dyn NotificationPublisher>,
        typing_timeout_secs: u64,
    ) -> Self {
        Self {
            store,
            publisher,
            typing_timeout_secs,
        }
    }

    /// Persona `actor_id` has read `trigger`: receipt first, then the watermark
    pub async fn mark_read(&self, room_id: Uuid, actor_id: Uuid, trigger: &Message) {
        let read_at = Utc::now();
        let event = NotificationEvent::ReadReceipt {
            actor_id,
            message_id: trigger.id,
            read_at,
        };
        publish_room(self.publisher.as_ref(), room_id, &event).await;

        if let Err(e) = self.store.mark_read(room_id, actor_id, read_at).await {
            tracing::warn!(room_id = %room_id, actor_id = %actor_id, error = %e, "Failed to persist read watermark");
        }
    }

    /// Show the typing indicator; it stays up until the guard is stopped.
    pub async fn start_typing(&self, room_id: Uuid, actor_id: Uuid) -> TypingGuard {
        let event = NotificationEvent::TypingStarted {
            actor_id,
            timeout_secs: self.typing_timeout_secs,
        };
        publish_room(self.publisher.as_ref(), room_id, &event).await;

        TypingGuard {
            publisher: Arc::clone(&self.publisher),
            room_id,
            actor_id,
            stopped: false,
        }
    }

    /// Persist the reply, bump the room and fan out the new-message events.
    pub async fn deliver(
        &self,
        organization_id: Uuid,
        room_id: Uuid,
        actor_id: Uuid,
        text: &str,
    ) -> Result<Message, DomainError> {
        let message = self.store.append_message(room_id, actor_id, text).await?;

        if let Err(e) = self.store.touch_room_updated_at(room_id).await {
            tracing::warn!(room_id = %room_id, error = %e, "Failed to bump room updated_at");
        }

        let received = NotificationEvent::MessageReceived {
            message: message.clone(),
        };
        publish_room(self.publisher.as_ref(), room_id, &received).await;

        let unread = NotificationEvent::UnreadCount {
            room_id,
            last_message_at: message.created_at,
        };
        if let Err(e) = self.publisher.publish_to_tenant(organization_id, &unread).await {
            tracing::warn!(
                organization_id = %organization_id,
                event = unread.event_type(),
                error = %e,
                "Failed to publish tenant event"
            );
        }

        Ok(message)
    }

    /// Tell the room the reply could not be produced
    pub async fn report_failure(&self, room_id: Uuid, actor_id: Uuid) {
        let event = NotificationEvent::ReplyFailed {
            actor_id,
            notice: REPLY_FAILED_NOTICE.to_string(),
        };
        publish_room(self.publisher.as_ref(), room_id, &event).await;
    }
}

async fn publish_room(publisher: &dyn NotificationPublisher, room_id: Uuid, event: &NotificationEvent) {
    if let Err(e) = publisher.publish_to_room(room_id, event).await {
        tracing::warn!(
            room_id = %room_id,
            event = event.event_type(),
            error = %e,
            "Failed to publish room event"
        );
    }
}

/// Open typing indicator
///
/// Call [`TypingGuard::stop`] on every path. If the guard is dropped while
/// still open (panic, cancelled task) a stop event is spawned onto the
/// current runtime instead.
#[must_use = "the typing indicator stays visible until the guard is stopped"]
pub struct TypingGuard {
    publisher: Arc<dyn NotificationPublisher>,
    room_id: Uuid,
    actor_id: Uuid,
    stopped: bool,
}

impl TypingGuard {
    pub async fn stop(mut self) {
        self.stopped = true;
        let event = NotificationEvent::TypingStopped {
            actor_id: self.actor_id,
        };
        publish_room(self.publisher.as_ref(), self.room_id, &event).await;
    }
}

impl Drop for TypingGuard {
    fn drop(&mut self) {
        if self.stopped {
            return;
        }

        let event = NotificationEvent::TypingStopped {
            actor_id: self.actor_id,
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let publisher = Arc::clone(&self.publisher);
                let room_id = self.room_id;
                handle.spawn(async move {
                    publish_room(publisher.as_ref(), room_id, &event).await;
                });
            }
            Err(_) => {
                tracing::warn!(room_id = %self.room_id, "Typing guard dropped outside a runtime");
            }
        }
    }
}
