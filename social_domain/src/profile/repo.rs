use entrait::entrait_export as entrait;
use time::OffsetDateTime;

use super::{PrivacyLevel, Profile};
use crate::error::SocialResult;
use crate::UserId;

/// A validated partial profile write.
///
/// `None` fields leave the stored value untouched. `username` always
/// overwrites, since it mirrors the identity provider. `display_name` comes
/// from the identity too, but tokens may omit it.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileChanges {
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub birth_date: Option<time::Date>,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub privacy_level: Option<PrivacyLevel>,
    pub theme: Option<serde_json::Value>,
    pub updated_at: OffsetDateTime,
}

impl ProfileChanges {
    pub fn new(username: impl Into<String>, updated_at: OffsetDateTime) -> Self {
        Self {
            username: username.into(),
            display_name: None,
            bio: None,
            website: None,
            location: None,
            birth_date: None,
            avatar_url: None,
            cover_image_url: None,
            privacy_level: None,
            theme: None,
            updated_at,
        }
    }
}

#[entrait(ProfileRepoImpl, delegate_by = DelegateProfileRepo, mock_api = ProfileRepoMock)]
pub trait ProfileRepo {
    async fn find_profile(&self, user_id: UserId) -> SocialResult<Option<Profile>>;

    async fn find_profile_by_username(&self, username: &str) -> SocialResult<Option<Profile>>;

    /// Insert the profile, or merge `changes` into the existing one, atomically.
    async fn upsert_profile(
        &self,
        user_id: UserId,
        changes: ProfileChanges,
    ) -> SocialResult<Profile>;
}
