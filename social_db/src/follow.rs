use crate::{DbResultExt, GetDb};

use social_domain::error::{SocialError, SocialResult};
use social_domain::follow::FollowStatus;
use social_domain::UserId;

use entrait::*;
use sqlx::error::ErrorKind;
use time::OffsetDateTime;
use uuid::Uuid;

pub struct SqliteFollowRepo;

#[entrait]
impl social_domain::follow::repo::FollowRepoImpl for SqliteFollowRepo {
    pub async fn insert_follow(
        deps: &impl GetDb,
        subscriber_id: UserId,
        target_id: UserId,
        created_at: OffsetDateTime,
    ) -> SocialResult<FollowStatus> {
        let result = sqlx::query(
            r#"
            INSERT INTO follow (subscriber_id, target_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (subscriber_id, target_id) DO NOTHING
            "#,
        )
        .bind(subscriber_id.0)
        .bind(target_id.0)
        .bind(created_at)
        .execute(&deps.get_db().pool)
        .await
        .on_violation(ErrorKind::CheckViolation, |_| {
            SocialError::SelfFollowRejected
        })?;

        Ok(match result.rows_affected() {
            0 => FollowStatus::AlreadyFollowing,
            _ => FollowStatus::Followed,
        })
    }

    pub async fn delete_follow(
        deps: &impl GetDb,
        subscriber_id: UserId,
        target_id: UserId,
    ) -> SocialResult<()> {
        sqlx::query("DELETE FROM follow WHERE subscriber_id = $1 AND target_id = $2")
            .bind(subscriber_id.0)
            .bind(target_id.0)
            .execute(&deps.get_db().pool)
            .await?;

        Ok(())
    }

    pub async fn is_following(
        deps: &impl GetDb,
        subscriber_id: UserId,
        target_id: UserId,
    ) -> SocialResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM follow WHERE subscriber_id = $1 AND target_id = $2)",
        )
        .bind(subscriber_id.0)
        .bind(target_id.0)
        .fetch_one(&deps.get_db().pool)
        .await?;

        Ok(exists)
    }

    pub async fn find_following(deps: &impl GetDb, user_id: UserId) -> SocialResult<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT target_id FROM follow WHERE subscriber_id = $1 ORDER BY seq",
        )
        .bind(user_id.0)
        .fetch_all(&deps.get_db().pool)
        .await?;

        Ok(ids.into_iter().map(UserId).collect())
    }

    pub async fn find_followers(deps: &impl GetDb, user_id: UserId) -> SocialResult<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT subscriber_id FROM follow WHERE target_id = $1 ORDER BY seq",
        )
        .bind(user_id.0)
        .fetch_all(&deps.get_db().pool)
        .await?;

        Ok(ids.into_iter().map(UserId).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::{create_test_db, Db, GetDb};

    use social_domain::error::{SocialError, SocialResult};
    use social_domain::follow::repo::FollowRepo;
    use social_domain::follow::FollowStatus;
    use social_domain::UserId;

    use assert_matches::*;
    use time::OffsetDateTime;

    fn user(n: u8) -> UserId {
        UserId(uuid::Uuid::from_bytes([n; 16]))
    }

    const NOW: OffsetDateTime = OffsetDateTime::UNIX_EPOCH;

    #[tokio::test]
    async fn follow_should_be_idempotent() -> SocialResult<()> {
        let db = create_test_db().await;

        assert_eq!(
            FollowStatus::Followed,
            db.insert_follow(user(1), user(2), NOW).await?
        );
        assert_eq!(
            FollowStatus::AlreadyFollowing,
            db.insert_follow(user(1), user(2), NOW).await?
        );

        assert_eq!(vec![user(2)], db.find_following(user(1)).await?);
        assert_eq!(vec![user(1)], db.find_followers(user(2)).await?);
        Ok(())
    }

    #[tokio::test]
    async fn edges_should_be_directed() -> SocialResult<()> {
        let db = create_test_db().await;
        db.insert_follow(user(1), user(2), NOW).await?;

        assert!(db.is_following(user(1), user(2)).await?);
        assert!(!db.is_following(user(2), user(1)).await?);
        assert_eq!(Vec::<UserId>::new(), db.find_following(user(2)).await?);
        Ok(())
    }

    #[tokio::test]
    async fn lists_should_keep_insertion_order() -> SocialResult<()> {
        let db = create_test_db().await;

        for target in [5, 3, 9] {
            db.insert_follow(user(1), user(target), NOW).await?;
        }
        for subscriber in [8, 2] {
            db.insert_follow(user(subscriber), user(3), NOW).await?;
        }

        assert_eq!(
            vec![user(5), user(3), user(9)],
            db.find_following(user(1)).await?
        );
        assert_eq!(
            vec![user(1), user(8), user(2)],
            db.find_followers(user(3)).await?
        );
        Ok(())
    }

    #[tokio::test]
    async fn unfollow_should_remove_only_that_edge() -> SocialResult<()> {
        let db = create_test_db().await;
        db.insert_follow(user(1), user(2), NOW).await?;
        db.insert_follow(user(1), user(3), NOW).await?;

        db.delete_follow(user(1), user(2)).await?;
        db.delete_follow(user(1), user(2)).await?;

        assert_eq!(vec![user(3)], db.find_following(user(1)).await?);
        assert!(!db.is_following(user(1), user(2)).await?);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_follows_should_create_a_single_edge() -> SocialResult<()> {
        let path =
            std::env::temp_dir().join(format!("social-follow-{}.db", uuid::Uuid::new_v4()));
        let db = entrait::Impl::new(
            Db::init(&format!("sqlite://{}", path.display()), 4)
                .await
                .unwrap(),
        );

        let (a, b, c, d) = tokio::join!(
            db.insert_follow(user(1), user(2), NOW),
            db.insert_follow(user(1), user(2), NOW),
            db.insert_follow(user(1), user(2), NOW),
            db.insert_follow(user(1), user(2), NOW),
        );
        let statuses = [a?, b?, c?, d?];

        assert_eq!(
            1,
            statuses
                .iter()
                .filter(|status| **status == FollowStatus::Followed)
                .count()
        );
        assert_eq!(vec![user(2)], db.find_following(user(1)).await?);

        db.get_db().pool.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
        Ok(())
    }

    #[tokio::test]
    async fn storage_should_refuse_self_edges() {
        let db = create_test_db().await;

        assert_matches!(
            db.insert_follow(user(1), user(1), NOW).await,
            Err(SocialError::SelfFollowRejected)
        );
    }
}
