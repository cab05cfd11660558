use crate::GetDb;

use social_domain::error::SocialResult;
use social_domain::settings::repo::{SettingsChanges, StoredSettings};
use social_domain::UserId;

use entrait::*;
use sqlx::types::Json;
use std::collections::BTreeMap;
use time::OffsetDateTime;

#[derive(sqlx::FromRow)]
struct SettingsRow {
    language: String,
    notifications: Json<BTreeMap<String, bool>>,
}

impl From<SettingsRow> for StoredSettings {
    fn from(row: SettingsRow) -> Self {
        Self {
            language: row.language,
            notifications: row.notifications.0,
        }
    }
}

pub struct SqliteSettingsRepo;

#[entrait]
impl social_domain::settings::repo::SettingsRepoImpl for SqliteSettingsRepo {
    pub async fn find_settings(
        deps: &impl GetDb,
        user_id: UserId,
    ) -> SocialResult<Option<StoredSettings>> {
        let row = sqlx::query_as::<_, SettingsRow>(
            "SELECT language, notifications FROM user_settings WHERE user_id = $1",
        )
        .bind(user_id.0)
        .fetch_optional(&deps.get_db().pool)
        .await?;

        Ok(row.map(StoredSettings::from))
    }

    pub async fn upsert_settings(
        deps: &impl GetDb,
        user_id: UserId,
        changes: SettingsChanges,
        updated_at: OffsetDateTime,
    ) -> SocialResult<StoredSettings> {
        let defaults = StoredSettings::default();

        let row = sqlx::query_as::<_, SettingsRow>(
            // language=SQLite
            r#"
            INSERT INTO user_settings (user_id, language, notifications, updated_at)
            VALUES ($1, COALESCE($2, $4), COALESCE($3, $5), $6)
            ON CONFLICT (user_id) DO UPDATE SET
                language = COALESCE($2, language),
                notifications = COALESCE($3, notifications),
                updated_at = $6
            RETURNING language, notifications
            "#,
        )
        .bind(user_id.0)
        .bind(changes.language)
        .bind(changes.notifications.map(Json))
        .bind(defaults.language)
        .bind(Json(defaults.notifications))
        .bind(updated_at)
        .fetch_one(&deps.get_db().pool)
        .await?;

        Ok(row.into())
    }
}
