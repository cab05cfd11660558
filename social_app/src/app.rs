use social_db::{Db, GetDb, SqliteFollowRepo, SqliteProfileRepo, SqliteSettingsRepo};
use social_domain::follow::repo::DelegateFollowRepo;
use social_domain::profile::repo::DelegateProfileRepo;
use social_domain::settings::repo::DelegateSettingsRepo;
use social_domain::{GetConfig, JwtKeys, System};

use time::OffsetDateTime;

#[derive(Clone)]
pub struct App {
    pub jwt_keys: JwtKeys,
    pub db: Db,
}

impl System for App {
    fn get_current_time(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

impl GetConfig for App {
    fn get_jwt_keys(&self) -> &JwtKeys {
        &self.jwt_keys
    }
}

impl GetDb for App {
    fn get_db(&self) -> &Db {
        &self.db
    }
}

impl DelegateProfileRepo<Self> for App {
    type Target = SqliteProfileRepo;
}

impl DelegateFollowRepo<Self> for App {
    type Target = SqliteFollowRepo;
}

impl DelegateSettingsRepo<Self> for App {
    type Target = SqliteSettingsRepo;
}
