//! PostgreSQL implementation of MessageStore and TenantRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use hibiki::{BotSettings, DomainError, Message, MessageStore, PersonaKind, Room, TenantRepository, Vendor};

/// PostgreSQL implementation of the chat store ports
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    room_id: Uuid,
    actor_id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            room_id: row.room_id,
            actor_id: row.actor_id,
            text: row.text,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RoomRow {
    id: Uuid,
    organization_id: Uuid,
    name: String,
    updated_at: DateTime<Utc>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Self {
            id: row.id,
            organization_id: row.organization_id,
            name: row.name,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BotSettingsRow {
    organization_id: Uuid,
    enabled: bool,
    vendor: String,
    api_key: Option<String>,
    model: Option<String>,
}

impl TryFrom<BotSettingsRow> for BotSettings {
    type Error = DomainError;

    fn try_from(row: BotSettingsRow) -> Result<Self, Self::Error> {
        let vendor: Vendor = row.vendor.parse().map_err(|e: String| {
            DomainError::Configuration(format!("Organization {}: {}", row.organization_id, e))
        })?;

        Ok(Self {
            organization_id: row.organization_id,
            enabled: row.enabled,
            vendor,
            api_key: row.api_key,
            model: row.model,
        })
    }
}

fn repo_err(e: sqlx::Error) -> DomainError {
    DomainError::Repository(e.to_string())
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn get_message(&self, id: Uuid) -> Result<Option<Message>, DomainError> {
        let row = sqlx::query_as::<_, MessageRow>(
            "SELECT id, room_id, actor_id, text, created_at FROM messages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(repo_err)?;

        Ok(row.map(Into::into))
    }

    async fn list_recent_messages(
        &self,
        room_id: Uuid,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Message>, DomainError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, room_id, actor_id, text, created_at FROM (
                SELECT id, room_id, actor_id, text, created_at
                FROM messages
                WHERE room_id = $1 AND created_at >= $2
                ORDER BY created_at DESC
                LIMIT $3
            ) recent
            ORDER BY created_at ASC
            "#,
        )
        .bind(room_id)
        .bind(since)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(repo_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn append_message(
        &self,
        room_id: Uuid,
        actor_id: Uuid,
        text: &str,
    ) -> Result<Message, DomainError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, room_id, actor_id, text)
            VALUES ($1, $2, $3, $4)
            RETURNING id, room_id, actor_id, text, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(room_id)
        .bind(actor_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
        .map_err(repo_err)?;

        Ok(row.into())
    }

    async fn get_room(&self, id: Uuid) -> Result<Option<Room>, DomainError> {
        let row = sqlx::query_as::<_, RoomRow>(
            "SELECT id, organization_id, name, updated_at FROM rooms WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(repo_err)?;

        Ok(row.map(Into::into))
    }

    async fn touch_room_updated_at(&self, id: Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE rooms SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(repo_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Room", id));
        }

        Ok(())
    }

    async fn get_actor_display_name(&self, actor_id: Uuid) -> Result<Option<String>, DomainError> {
        sqlx::query_scalar::<_, String>("SELECT display_name FROM actors WHERE id = $1")
            .bind(actor_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(repo_err)
    }

    async fn resolve_persona_actor(
        &self,
        kind: PersonaKind,
        organization_id: Uuid,
    ) -> Result<Option<Uuid>, DomainError> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT actor_id FROM persona_actors WHERE organization_id = $1 AND persona_kind = $2",
        )
        .bind(organization_id)
        .bind(kind.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(repo_err)
    }

    async fn persona_kind_of_actor(&self, actor_id: Uuid) -> Result<Option<PersonaKind>, DomainError> {
        let raw = sqlx::query_scalar::<_, String>("SELECT persona_kind FROM persona_actors WHERE actor_id = $1")
            .bind(actor_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(repo_err)?;

        match raw {
            Some(raw) => raw
                .parse::<PersonaKind>()
                .map(Some)
                .map_err(DomainError::Repository),
            None => Ok(None),
        }
    }

    async fn mark_read(
        &self,
        room_id: Uuid,
        actor_id: Uuid,
        read_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO room_reads (room_id, actor_id, last_read_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (room_id, actor_id)
            DO UPDATE SET last_read_at = GREATEST(room_reads.last_read_at, EXCLUDED.last_read_at)
            "#,
        )
        .bind(room_id)
        .bind(actor_id)
        .bind(read_at)
        .execute(&self.pool)
        .await
        .map_err(repo_err)?;

        Ok(())
    }
}

#[async_trait]
impl TenantRepository for PgMessageStore {
    async fn find_bot_settings(&self, organization_id: Uuid) -> Result<Option<BotSettings>, DomainError> {
        let row = sqlx::query_as::<_, BotSettingsRow>(
            r#"
            SELECT organization_id, enabled, vendor, api_key, model
            FROM bot_settings
            WHERE organization_id = $1
            "#,
        )
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(repo_err)?;

        row.map(BotSettings::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_row_with_unknown_vendor_is_configuration_error() {
        let row = BotSettingsRow {
            organization_id: Uuid::new_v4(),
            enabled: true,
            vendor: "mistral".into(),
            api_key: Some("k".into()),
            model: None,
        };

        assert!(matches!(BotSettings::try_from(row), Err(DomainError::Configuration(_))));
    }

    #[test]
    fn test_settings_row_accepts_vendor_aliases() {
        let row = BotSettingsRow {
            organization_id: Uuid::new_v4(),
            enabled: true,
            vendor: "Claude".into(),
            api_key: None,
            model: None,
        };

        assert_eq!(BotSettings::try_from(row).unwrap().vendor, Vendor::Anthropic);
    }
}
