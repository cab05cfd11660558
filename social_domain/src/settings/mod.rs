pub mod repo;

use crate::auth::{Authenticate, Token};
use crate::error::{SocialError, SocialResult};
use crate::profile::repo::{ProfileChanges, ProfileRepo};
use crate::profile::validate_theme;
use crate::{System, UserId};

use entrait::entrait_export as entrait;
use repo::{SettingsChanges, SettingsRepo, StoredSettings};
use std::collections::BTreeMap;

const MAX_LANGUAGE_LEN: usize = 16;

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    pub user_id: UserId,
    pub theme: serde_json::Value,
    pub language: String,
    pub notifications: BTreeMap<String, bool>,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SettingsUpdate {
    pub theme: Option<serde_json::Value>,
    pub language: Option<String>,
    pub notifications: Option<BTreeMap<String, bool>>,
}

pub fn default_theme() -> serde_json::Value {
    serde_json::json!({
        "mode": "light",
        "primary_color": "#1976d2",
    })
}

#[entrait(pub FetchSettings, mock_api=FetchSettingsMock)]
async fn fetch_settings(
    deps: &(impl Authenticate + ProfileRepo + SettingsRepo),
    token: Token,
) -> SocialResult<Settings> {
    let user_id = deps.authenticate(token)?.user_id;

    let theme = deps
        .find_profile(user_id)
        .await?
        .and_then(|profile| profile.theme);
    let stored = deps.find_settings(user_id).await?.unwrap_or_default();

    Ok(assemble(user_id, theme, stored))
}

#[entrait(pub UpdateSettings, mock_api=UpdateSettingsMock)]
async fn update_settings(
    deps: &(impl Authenticate + ProfileRepo + SettingsRepo + System),
    token: Token,
    update: SettingsUpdate,
) -> SocialResult<Settings> {
    let identity = deps.authenticate(token)?;
    if let Some(language) = &update.language {
        validate_language(language)?;
    }
    let theme = update.theme.map(validate_theme).transpose()?;
    let now = deps.get_current_time();

    // The theme lives on the profile record.
    let theme = match theme {
        Some(theme) => {
            let changes = ProfileChanges {
                theme: Some(theme),
                display_name: identity.display_name.clone(),
                ..ProfileChanges::new(identity.username.clone(), now)
            };
            deps.upsert_profile(identity.user_id, changes).await?.theme
        }
        None => deps
            .find_profile(identity.user_id)
            .await?
            .and_then(|profile| profile.theme),
    };

    let changes = SettingsChanges {
        language: update.language,
        notifications: update.notifications,
    };
    let stored = if changes == SettingsChanges::default() {
        deps.find_settings(identity.user_id)
            .await?
            .unwrap_or_default()
    } else {
        deps.upsert_settings(identity.user_id, changes, now).await?
    };

    Ok(assemble(identity.user_id, theme, stored))
}

fn assemble(
    user_id: UserId,
    theme: Option<serde_json::Value>,
    stored: StoredSettings,
) -> Settings {
    Settings {
        user_id,
        theme: theme.unwrap_or_else(default_theme),
        language: stored.language,
        notifications: stored.notifications,
    }
}

fn validate_language(language: &str) -> SocialResult<()> {
    let well_formed = !language.is_empty()
        && language.len() <= MAX_LANGUAGE_LEN
        && language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');

    if well_formed {
        Ok(())
    } else {
        Err(SocialError::validation(
            "language",
            "expected a language tag such as \"en\" or \"pt-BR\"",
        ))
    }
}
