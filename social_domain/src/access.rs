use crate::auth::Identity;
use crate::profile::{PrivacyLevel, Profile};
use crate::UserId;

/// What a viewer is allowed to see of a profile.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ProfileView {
    Full(Profile),
    Redacted(RedactedProfile),
}

/// The fields of a profile that are visible to everyone.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct RedactedProfile {
    pub user_id: UserId,
    pub username: String,
}

impl ProfileView {
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Full(profile) => profile.user_id,
            Self::Redacted(redacted) => redacted.user_id,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }
}

/// Apply the privacy policy of `profile` to `viewer`.
///
/// `owner_follows_viewer` must tell whether the profile owner has a follow
/// edge towards the viewer; it only matters for `friends` profiles.
pub fn authorize_profile_read(
    viewer: Option<&Identity>,
    profile: Profile,
    owner_follows_viewer: bool,
) -> ProfileView {
    let is_owner = viewer.map_or(false, |viewer| viewer.user_id == profile.user_id);

    let full = is_owner
        || match profile.privacy_level {
            PrivacyLevel::Public => true,
            PrivacyLevel::Friends => viewer.is_some() && owner_follows_viewer,
            PrivacyLevel::Private => false,
        };

    if full {
        ProfileView::Full(profile)
    } else {
        ProfileView::Redacted(RedactedProfile {
            user_id: profile.user_id,
            username: profile.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::user_id;

    use assert_matches::*;
    use time::OffsetDateTime;

    fn profile(privacy_level: PrivacyLevel) -> Profile {
        Profile {
            user_id: user_id(1),
            username: "owner".to_string(),
            display_name: None,
            bio: Some("bio".to_string()),
            website: Some("https://example.com".to_string()),
            location: None,
            birth_date: None,
            avatar_url: None,
            cover_image_url: None,
            privacy_level,
            theme: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn viewer(n: u8) -> Identity {
        Identity {
            user_id: user_id(n),
            username: format!("viewer{n}"),
            display_name: None,
        }
    }

    #[test]
    fn public_profile_is_fully_visible_to_anyone() {
        assert!(authorize_profile_read(None, profile(PrivacyLevel::Public), false).is_full());
        assert!(
            authorize_profile_read(Some(&viewer(2)), profile(PrivacyLevel::Public), false)
                .is_full()
        );
    }

    #[test]
    fn private_profile_is_redacted_for_non_owners() {
        for (viewer, owner_follows_viewer) in [(None, false), (Some(viewer(2)), true)] {
            let view = authorize_profile_read(
                viewer.as_ref(),
                profile(PrivacyLevel::Private),
                owner_follows_viewer,
            );

            assert_eq!(
                ProfileView::Redacted(RedactedProfile {
                    user_id: user_id(1),
                    username: "owner".to_string(),
                }),
                view
            );
        }
    }

    #[test]
    fn friends_profile_requires_edge_from_owner_to_viewer() {
        assert_matches!(
            authorize_profile_read(Some(&viewer(2)), profile(PrivacyLevel::Friends), true),
            ProfileView::Full(_)
        );
        assert_matches!(
            authorize_profile_read(Some(&viewer(2)), profile(PrivacyLevel::Friends), false),
            ProfileView::Redacted(_)
        );
        assert_matches!(
            authorize_profile_read(None, profile(PrivacyLevel::Friends), true),
            ProfileView::Redacted(_)
        );
    }

    #[test]
    fn owner_always_sees_everything() {
        for level in [
            PrivacyLevel::Public,
            PrivacyLevel::Friends,
            PrivacyLevel::Private,
        ] {
            assert!(authorize_profile_read(Some(&viewer(1)), profile(level), false).is_full());
        }
    }

    #[test]
    fn redacted_view_serializes_minimal_fields() {
        let view = authorize_profile_read(None, profile(PrivacyLevel::Private), false);

        assert_eq!(
            serde_json::json!({
                "user_id": user_id(1),
                "username": "owner",
            }),
            serde_json::to_value(&view).unwrap()
        );
    }
}
