//! Notification Publisher Port
//!
//! Abstract interface for the realtime fan-out transport.
//! Delivery is at-most-once; no acknowledgement is tracked.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, NotificationEvent};

/// Realtime publish interface
///
/// Errors are reported so callers can log them; callers never retry.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// Publish to everyone subscribed to a room
    async fn publish_to_room(
        &self,
        room_id: Uuid,
        event: &NotificationEvent,
    ) -> Result<(), DomainError>;

    /// Publish to the tenant-wide subscriber group
    async fn publish_to_tenant(
        &self,
        organization_id: Uuid,
        event: &NotificationEvent,
    ) -> Result<(), DomainError>;
}
