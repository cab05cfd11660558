pub mod repo;

use crate::access::{self, ProfileView};
use crate::auth::{self, Authenticate, Identity, Token};
use crate::error::{SocialError, SocialResult};
use crate::follow::repo::FollowRepo;
use crate::{System, UserId};

use entrait::entrait_export as entrait;
use repo::{ProfileChanges, ProfileRepo};
use std::str::FromStr;
use time::OffsetDateTime;

const MAX_WEBSITE_LEN: usize = 255;
const MAX_LOCATION_LEN: usize = 100;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    #[default]
    Public,
    Friends,
    Private,
}

impl PrivacyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Friends => "friends",
            Self::Private => "private",
        }
    }
}

impl FromStr for PrivacyLevel {
    type Err = SocialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "friends" => Ok(Self::Friends),
            "private" => Ok(Self::Private),
            other => Err(SocialError::validation(
                "privacy_level",
                format!("expected one of public, friends, private; got {other:?}"),
            )),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct Profile {
    pub user_id: UserId,
    pub username: String,
    /// Mirrors the identity's display name, when the identity carries one.
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    #[serde(default, with = "iso_date::option")]
    pub birth_date: Option<time::Date>,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub privacy_level: PrivacyLevel,
    pub theme: Option<serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Partial profile payload as sent by clients. Absent or `null` fields are
/// left unchanged.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ProfileUpsert {
    pub bio: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub birth_date: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub privacy_level: Option<String>,
    pub theme: Option<serde_json::Value>,
}

impl ProfileUpsert {
    fn validate(self, identity: &Identity, now: OffsetDateTime) -> SocialResult<ProfileChanges> {
        if let Some(website) = &self.website {
            check_max_len("website", website, MAX_WEBSITE_LEN)?;
        }
        if let Some(location) = &self.location {
            check_max_len("location", location, MAX_LOCATION_LEN)?;
        }

        let birth_date = self
            .birth_date
            .as_deref()
            .map(parse_birth_date)
            .transpose()?;
        let privacy_level = self
            .privacy_level
            .as_deref()
            .map(PrivacyLevel::from_str)
            .transpose()?;
        let theme = self.theme.map(validate_theme).transpose()?;

        Ok(ProfileChanges {
            username: identity.username.clone(),
            display_name: identity.display_name.clone(),
            bio: self.bio,
            website: self.website,
            location: self.location,
            birth_date,
            avatar_url: self.avatar_url,
            cover_image_url: self.cover_image_url,
            privacy_level,
            theme,
            updated_at: now,
        })
    }
}

fn check_max_len(field: &'static str, value: &str, max: usize) -> SocialResult<()> {
    if value.chars().count() > max {
        return Err(SocialError::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

fn parse_birth_date(value: &str) -> SocialResult<time::Date> {
    time::Date::parse(
        value,
        time::macros::format_description!("[year]-[month]-[day]"),
    )
    .map_err(|_| SocialError::validation("birth_date", "expected a date formatted as YYYY-MM-DD"))
}

/// The theme is opaque, but it has to be a key-value document.
pub(crate) fn validate_theme(theme: serde_json::Value) -> SocialResult<serde_json::Value> {
    if theme.is_object() {
        Ok(theme)
    } else {
        Err(SocialError::validation("theme", "must be a JSON object"))
    }
}

#[entrait(pub FetchProfile, mock_api=FetchProfileMock)]
async fn fetch_profile(
    deps: &(impl Authenticate + ProfileRepo + FollowRepo),
    token: Option<Token>,
    user_id: UserId,
) -> SocialResult<ProfileView> {
    let viewer = auth::authenticate_viewer(deps, token)?;
    let profile = deps
        .find_profile(user_id)
        .await?
        .ok_or(SocialError::ProfileNotFound)?;

    visible_profile(deps, viewer.as_ref(), profile).await
}

#[entrait(pub FetchProfileByUsername, mock_api=FetchProfileByUsernameMock)]
async fn fetch_profile_by_username(
    deps: &(impl Authenticate + ProfileRepo + FollowRepo),
    token: Option<Token>,
    username: &str,
) -> SocialResult<ProfileView> {
    let viewer = auth::authenticate_viewer(deps, token)?;
    let profile = deps
        .find_profile_by_username(username)
        .await?
        .ok_or(SocialError::ProfileNotFound)?;

    visible_profile(deps, viewer.as_ref(), profile).await
}

#[entrait(pub FetchOwnProfile, mock_api=FetchOwnProfileMock)]
async fn fetch_own_profile(
    deps: &(impl Authenticate + ProfileRepo),
    token: Token,
) -> SocialResult<Profile> {
    let identity = deps.authenticate(token)?;

    deps.find_profile(identity.user_id)
        .await?
        .ok_or(SocialError::ProfileNotFound)
}

#[entrait(pub UpsertProfile, mock_api=UpsertProfileMock)]
async fn upsert_profile(
    deps: &(impl Authenticate + ProfileRepo + System),
    token: Token,
    upsert: ProfileUpsert,
) -> SocialResult<Profile> {
    let identity = deps.authenticate(token)?;
    let changes = upsert.validate(&identity, deps.get_current_time())?;

    let profile = deps.upsert_profile(identity.user_id, changes).await?;
    tracing::info!(user_id = %profile.user_id, "profile upserted");

    Ok(profile)
}

async fn visible_profile(
    deps: &impl FollowRepo,
    viewer: Option<&Identity>,
    profile: Profile,
) -> SocialResult<ProfileView> {
    // Only friends-level profiles depend on the graph.
    let owner_follows_viewer = match viewer {
        Some(viewer)
            if profile.privacy_level == PrivacyLevel::Friends
                && viewer.user_id != profile.user_id =>
        {
            deps.is_following(profile.user_id, viewer.user_id).await?
        }
        _ => false,
    };

    Ok(access::authorize_profile_read(
        viewer,
        profile,
        owner_follows_viewer,
    ))
}
