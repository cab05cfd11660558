use crate::GetDb;

use social_domain::error::{SocialError, SocialResult};
use social_domain::profile::repo::ProfileChanges;
use social_domain::profile::{PrivacyLevel, Profile};
use social_domain::UserId;

use anyhow::anyhow;
use entrait::*;
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: Uuid,
    username: String,
    display_name: Option<String>,
    bio: Option<String>,
    website: Option<String>,
    location: Option<String>,
    birth_date: Option<time::Date>,
    avatar_url: Option<String>,
    cover_image_url: Option<String>,
    privacy_level: String,
    theme: Option<Json<serde_json::Value>>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = SocialError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let privacy_level = row
            .privacy_level
            .parse::<PrivacyLevel>()
            .map_err(|_| anyhow!("corrupt privacy_level for {}", row.user_id))?;

        Ok(Profile {
            user_id: UserId(row.user_id),
            username: row.username,
            display_name: row.display_name,
            bio: row.bio,
            website: row.website,
            location: row.location,
            birth_date: row.birth_date,
            avatar_url: row.avatar_url,
            cover_image_url: row.cover_image_url,
            privacy_level,
            theme: row.theme.map(|Json(theme)| theme),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PROFILE_COLUMNS: &str = "user_id, username, display_name, bio, website, location, birth_date, \
    avatar_url, cover_image_url, privacy_level, theme, created_at, updated_at";

pub struct SqliteProfileRepo;

#[entrait]
impl social_domain::profile::repo::ProfileRepoImpl for SqliteProfileRepo {
    pub async fn find_profile(deps: &impl GetDb, user_id: UserId) -> SocialResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profile WHERE user_id = $1"
        ))
        .bind(user_id.0)
        .fetch_optional(&deps.get_db().pool)
        .await?;

        row.map(Profile::try_from).transpose()
    }

    pub async fn find_profile_by_username(
        deps: &impl GetDb,
        username: &str,
    ) -> SocialResult<Option<Profile>> {
        // Usernames are owned by the identity provider; after a rename two rows
        // may briefly carry the same one, and the freshest wins.
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profile WHERE username = $1 \
             ORDER BY updated_at DESC LIMIT 1"
        ))
        .bind(username)
        .fetch_optional(&deps.get_db().pool)
        .await?;

        row.map(Profile::try_from).transpose()
    }

    pub async fn upsert_profile(
        deps: &impl GetDb,
        user_id: UserId,
        changes: ProfileChanges,
    ) -> SocialResult<Profile> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            // language=SQLite
            r#"
            INSERT INTO profile (
                user_id, username, bio, website, location, birth_date,
                avatar_url, cover_image_url, privacy_level, theme, created_at, updated_at,
                display_name
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 'public'), $10, $11, $11, $12)
            ON CONFLICT (user_id) DO UPDATE SET
                username = $2,
                display_name = COALESCE($12, display_name),
                bio = COALESCE($3, bio),
                website = COALESCE($4, website),
                location = COALESCE($5, location),
                birth_date = COALESCE($6, birth_date),
                avatar_url = COALESCE($7, avatar_url),
                cover_image_url = COALESCE($8, cover_image_url),
                privacy_level = COALESCE($9, privacy_level),
                theme = COALESCE($10, theme),
                updated_at = $11
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id.0)
        .bind(changes.username)
        .bind(changes.bio)
        .bind(changes.website)
        .bind(changes.location)
        .bind(changes.birth_date)
        .bind(changes.avatar_url)
        .bind(changes.cover_image_url)
        .bind(changes.privacy_level.map(|level| level.as_str()))
        .bind(changes.theme.map(Json))
        .bind(changes.updated_at)
        .bind(changes.display_name)
        .fetch_one(&deps.get_db().pool)
        .await?;

        Profile::try_from(row)
    }
}
