use social_domain::auth::Token;
use social_domain::error::SocialResult;
use social_domain::follow::{FollowResult, FollowStatus};
use social_domain::UserId;

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Json;

pub struct FollowRoutes<D>(std::marker::PhantomData<D>);

impl<D> FollowRoutes<D>
where
    D: social_domain::follow::Follow
        + social_domain::follow::Unfollow
        + social_domain::follow::ListFollowing
        + social_domain::follow::ListFollowers
        + Sized
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub fn router() -> axum::Router {
        axum::Router::new()
            .route(
                "/profiles/:user_id/follow",
                post(Self::follow).delete(Self::unfollow),
            )
            .route("/profiles/:user_id/following", get(Self::following))
            .route("/profiles/:user_id/followers", get(Self::followers))
    }

    async fn follow(
        Extension(deps): Extension<D>,
        token: Token,
        Path(target_user_id): Path<UserId>,
    ) -> SocialResult<(StatusCode, Json<FollowResult>)> {
        let result = deps.follow(token, target_user_id).await?;
        let status = match result.status {
            FollowStatus::Followed => StatusCode::CREATED,
            _ => StatusCode::OK,
        };

        Ok((status, Json(result)))
    }

    async fn unfollow(
        Extension(deps): Extension<D>,
        token: Token,
        Path(target_user_id): Path<UserId>,
    ) -> SocialResult<Json<FollowResult>> {
        Ok(Json(deps.unfollow(token, target_user_id).await?))
    }

    async fn following(
        Extension(deps): Extension<D>,
        Path(user_id): Path<UserId>,
    ) -> SocialResult<Json<Vec<UserId>>> {
        Ok(Json(deps.list_following(user_id).await?))
    }

    async fn followers(
        Extension(deps): Extension<D>,
        Path(user_id): Path<UserId>,
    ) -> SocialResult<Json<Vec<UserId>>> {
        Ok(Json(deps.list_followers(user_id).await?))
    }
}
