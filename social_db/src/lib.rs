use social_domain::error::SocialError;
use social_domain::follow::repo::DelegateFollowRepo;
use social_domain::profile::repo::DelegateProfileRepo;
use social_domain::settings::repo::DelegateSettingsRepo;

use anyhow::Context;
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

pub mod follow;
pub mod profile;
pub mod settings;

pub use follow::SqliteFollowRepo;
pub use profile::SqliteProfileRepo;
pub use settings::SqliteSettingsRepo;

#[derive(Clone)]
pub struct Db {
    pub pool: SqlitePool,
}

impl Db {
    pub async fn init(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .context("malformed database_url")?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("could not connect to database_url")?;

        Self::migrate(pool).await
    }

    /// A private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` opens a fresh database, so the
    /// pool is pinned to one connection that is never recycled.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("could not open in-memory database")?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::migrate!("../migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;
        tracing::debug!("database schema is up to date");

        Ok(Db { pool })
    }
}

/// Access to the database handle, for anything that owns one.
pub trait GetDb {
    fn get_db(&self) -> &Db;
}

impl GetDb for Db {
    fn get_db(&self) -> &Db {
        self
    }
}

impl<T: GetDb> GetDb for entrait::Impl<T> {
    fn get_db(&self) -> &Db {
        (**self).get_db()
    }
}

// A bare `Db` is a complete repository on its own, which is what the tests use.
impl DelegateProfileRepo<Self> for Db {
    type Target = SqliteProfileRepo;
}

impl DelegateFollowRepo<Self> for Db {
    type Target = SqliteFollowRepo;
}

impl DelegateSettingsRepo<Self> for Db {
    type Target = SqliteSettingsRepo;
}

trait DbResultExt<T> {
    fn on_violation(
        self,
        kind: ErrorKind,
        f: impl FnOnce(Box<dyn DatabaseError>) -> SocialError,
    ) -> Result<T, SocialError>;
}

impl<T, E> DbResultExt<T> for Result<T, E>
where
    E: Into<SocialError>,
{
    fn on_violation(
        self,
        kind: ErrorKind,
        map_err: impl FnOnce(Box<dyn DatabaseError>) -> SocialError,
    ) -> Result<T, SocialError> {
        self.map_err(|e| match e.into() {
            SocialError::Sqlx(sqlx::Error::Database(dbe)) if dbe.kind() == kind => map_err(dbe),
            e => e,
        })
    }
}

#[cfg(test)]
async fn create_test_db() -> entrait::Impl<Db> {
    entrait::Impl::new(
        Db::in_memory()
            .await
            .expect("failed to create test database"),
    )
}
