use social_domain::auth::Token;
use social_domain::error::SocialResult;
use social_domain::settings::{Settings, SettingsUpdate};

use axum::extract::Extension;
use axum::routing::get;
use axum::Json;

#[derive(serde::Serialize, serde::Deserialize, Debug)]
struct SettingsBody<T> {
    settings: T,
}

pub struct SettingsRoutes<D>(std::marker::PhantomData<D>);

impl<D> SettingsRoutes<D>
where
    D: social_domain::settings::FetchSettings
        + social_domain::settings::UpdateSettings
        + Sized
        + Clone
        + Send
        + Sync
        + 'static,
{
    pub fn router() -> axum::Router {
        axum::Router::new().route(
            "/settings",
            get(Self::fetch_settings).put(Self::update_settings),
        )
    }

    async fn fetch_settings(
        Extension(deps): Extension<D>,
        token: Token,
    ) -> SocialResult<Json<SettingsBody<Settings>>> {
        Ok(Json(SettingsBody {
            settings: deps.fetch_settings(token).await?,
        }))
    }

    async fn update_settings(
        Extension(deps): Extension<D>,
        token: Token,
        Json(body): Json<SettingsBody<SettingsUpdate>>,
    ) -> SocialResult<Json<SettingsBody<Settings>>> {
        Ok(Json(SettingsBody {
            settings: deps.update_settings(token, body.settings).await?,
        }))
    }
}
