use entrait::entrait_export as entrait;
use std::collections::BTreeMap;
use time::OffsetDateTime;

use crate::error::SocialResult;
use crate::UserId;

/// Settings persisted outside the profile record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoredSettings {
    pub language: String,
    pub notifications: BTreeMap<String, bool>,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            notifications: BTreeMap::from([("email".to_string(), true), ("push".to_string(), false)]),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SettingsChanges {
    pub language: Option<String>,
    pub notifications: Option<BTreeMap<String, bool>>,
}

#[entrait(SettingsRepoImpl, delegate_by = DelegateSettingsRepo, mock_api = SettingsRepoMock)]
pub trait SettingsRepo {
    async fn find_settings(&self, user_id: UserId) -> SocialResult<Option<StoredSettings>>;

    /// Insert defaults overlaid with `changes`, or merge `changes` into the
    /// existing row, atomically.
    async fn upsert_settings(
        &self,
        user_id: UserId,
        changes: SettingsChanges,
        updated_at: OffsetDateTime,
    ) -> SocialResult<StoredSettings>;
}
