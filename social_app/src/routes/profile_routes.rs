use social_domain::access::ProfileView;
use social_domain::auth::Token;
use social_domain::error::SocialResult;
use social_domain::profile::{Profile, ProfileUpsert};
use social_domain::UserId;

use axum::extract::{Extension, Path};
use axum::routing::get;
use axum::Json;

#[derive(serde::Serialize, serde::Deserialize, Debug)]
struct ProfileBody<T> {
    profile: T,
}

pub struct ProfileRoutes<D>(std::marker::PhantomData<D>);

impl<D> ProfileRoutes<D>
where
    D: social_domain::profile::FetchProfile
        + social_domain::profile::FetchProfileByUsername
        + social_domain::profile::FetchOwnProfile
        + social_domain::profile::UpsertProfile
        + Sized
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub fn router() -> axum::Router {
        axum::Router::new()
            .route("/profile", get(Self::own_profile).put(Self::upsert_profile))
            .route("/profiles/:user_id", get(Self::profile_by_id))
            .route("/users/:username/profile", get(Self::profile_by_username))
    }

    async fn own_profile(
        Extension(deps): Extension<D>,
        token: Token,
    ) -> SocialResult<Json<ProfileBody<Profile>>> {
        Ok(Json(ProfileBody {
            profile: deps.fetch_own_profile(token).await?,
        }))
    }

    async fn upsert_profile(
        Extension(deps): Extension<D>,
        token: Token,
        Json(body): Json<ProfileBody<ProfileUpsert>>,
    ) -> SocialResult<Json<ProfileBody<Profile>>> {
        Ok(Json(ProfileBody {
            profile: deps.upsert_profile(token, body.profile).await?,
        }))
    }

    async fn profile_by_id(
        Extension(deps): Extension<D>,
        token: Option<Token>,
        Path(user_id): Path<UserId>,
    ) -> SocialResult<Json<ProfileBody<ProfileView>>> {
        Ok(Json(ProfileBody {
            profile: deps.fetch_profile(token, user_id).await?,
        }))
    }

    async fn profile_by_username(
        Extension(deps): Extension<D>,
        token: Option<Token>,
        Path(username): Path<String>,
    ) -> SocialResult<Json<ProfileBody<ProfileView>>> {
        Ok(Json(ProfileBody {
            profile: deps.fetch_profile_by_username(token, &username).await?,
        }))
    }
}
