//! Realtime Notification Publishers
//!
//! `HttpNotificationPublisher` pushes events to the realtime gateway over
//! HTTP; `TracingPublisher` only logs them, for deployments without one.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use hibiki::{DomainError, NotificationEvent, NotificationPublisher};

pub const SIGNATURE_HEADER: &str = "X-Hibiki-Signature";

/// Envelope posted to the gateway
#[derive(Debug, Serialize)]
struct GatewayEnvelope<'a> {
    event_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    room_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    organization_id: Option<Uuid>,
    payload: &'a NotificationEvent,
}

/// HTTP implementation of NotificationPublisher
pub struct HttpNotificationPublisher {
    client: Client,
    base_url: String,
    signing_secret: Option<String>,
}

impl HttpNotificationPublisher {
    pub fn new(base_url: impl Into<String>, signing_secret: Option<String>) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .user_agent(concat!("hibiki/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            signing_secret,
        })
    }

    pub fn room_url(&self, room_id: Uuid) -> String {
        format!("{}/rooms/{}/events", self.base_url, room_id)
    }

    pub fn tenant_url(&self, organization_id: Uuid) -> String {
        format!("{}/tenants/{}/events", self.base_url, organization_id)
    }

    async fn post(&self, url: &str, envelope: &GatewayEnvelope<'_>) -> Result<(), DomainError> {
        let body = serde_json::to_vec(envelope).map_err(|e| {
            DomainError::ExternalService(format!("Failed to serialize event: {e}"))
        })?;

        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json");

        if let Some(secret) = &self.signing_secret {
            request = request.header(SIGNATURE_HEADER, sign_payload(secret, &body));
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Gateway unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::ExternalService(format!(
                "Gateway rejected {} event: HTTP {}",
                envelope.event_type,
                status.as_u16()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl NotificationPublisher for HttpNotificationPublisher {
    async fn publish_to_room(&self, room_id: Uuid, event: &NotificationEvent) -> Result<(), DomainError> {
        let envelope = GatewayEnvelope {
            event_type: event.event_type(),
            room_id: Some(room_id),
            organization_id: None,
            payload: event,
        };
        self.post(&self.room_url(room_id), &envelope).await
    }

    async fn publish_to_tenant(
        &self,
        organization_id: Uuid,
        event: &NotificationEvent,
    ) -> Result<(), DomainError> {
        let envelope = GatewayEnvelope {
            event_type: event.event_type(),
            room_id: None,
            organization_id: Some(organization_id),
            payload: event,
        };
        self.post(&self.tenant_url(organization_id), &envelope).await
    }
}

/// Hex HMAC-SHA256 of `payload`, prefixed with `sha256=`
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    // HMAC accepts keys of any length, so this never fails
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return String::new();
    };
    mac.update(payload);
    let bytes = mac.finalize().into_bytes();

    format!("sha256={}", hex::encode(bytes))
}

/// Logs events instead of delivering them
#[derive(Debug, Default)]
pub struct TracingPublisher;

#[async_trait]
impl NotificationPublisher for TracingPublisher {
    async fn publish_to_room(&self, room_id: Uuid, event: &NotificationEvent) -> Result<(), DomainError> {
        tracing::debug!(room_id = %room_id, event = event.event_type(), "Room event (no gateway)");
        Ok(())
    }

    async fn publish_to_tenant(
        &self,
        organization_id: Uuid,
        event: &NotificationEvent,
    ) -> Result<(), DomainError> {
        tracing::debug!(organization_id = %organization_id, event = event.event_type(), "Tenant event (no gateway)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_payload() {
        let signature = sign_payload("test-secret", b"test payload");

        assert!(signature.starts_with("sha256="));
        assert_eq!(signature.len(), 7 + 64); // "sha256=" + 64 hex chars
        assert_eq!(signature, sign_payload("test-secret", b"test payload"));
        assert_ne!(signature, sign_payload("other-secret", b"test payload"));
    }

    #[test]
    fn test_gateway_urls() {
        let publisher = HttpNotificationPublisher::new("https://rt.example.com/", None).unwrap();
        let id = Uuid::nil();

        assert_eq!(
            publisher.room_url(id),
            "https://rt.example.com/rooms/00000000-0000-0000-0000-000000000000/events"
        );
        assert_eq!(
            publisher.tenant_url(id),
            "https://rt.example.com/tenants/00000000-0000-0000-0000-000000000000/events"
        );
    }

    #[test]
    fn test_envelope_shape() {
        let event = NotificationEvent::TypingStopped { actor_id: Uuid::nil() };
        let envelope = GatewayEnvelope {
            event_type: event.event_type(),
            room_id: Some(Uuid::nil()),
            organization_id: None,
            payload: &event,
        };
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["event_type"], "typing_stopped");
        assert!(json.get("organization_id").is_none());
        assert_eq!(json["payload"]["type"], "typing_stopped");
    }
}
