pub mod repo;

use crate::auth::{Authenticate, Token};
use crate::error::{SocialError, SocialResult};
use crate::{System, UserId};

use entrait::entrait_export as entrait;
use repo::FollowRepo;

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FollowStatus {
    Followed,
    AlreadyFollowing,
    Unfollowed,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct FollowResult {
    pub subscriber_id: UserId,
    pub target_user_id: UserId,
    pub status: FollowStatus,
}

#[entrait(pub Follow, mock_api=FollowMock)]
async fn follow(
    deps: &(impl Authenticate + FollowRepo + System),
    token: Token,
    target_user_id: UserId,
) -> SocialResult<FollowResult> {
    let subscriber_id = deps.authenticate(token)?.user_id;
    if subscriber_id == target_user_id {
        return Err(SocialError::SelfFollowRejected);
    }

    let status = deps
        .insert_follow(subscriber_id, target_user_id, deps.get_current_time())
        .await?;
    tracing::info!(%subscriber_id, %target_user_id, ?status, "follow");

    Ok(FollowResult {
        subscriber_id,
        target_user_id,
        status,
    })
}

#[entrait(pub Unfollow, mock_api=UnfollowMock)]
async fn unfollow(
    deps: &(impl Authenticate + FollowRepo),
    token: Token,
    target_user_id: UserId,
) -> SocialResult<FollowResult> {
    let subscriber_id = deps.authenticate(token)?.user_id;

    // Removing an edge that does not exist is not an error.
    deps.delete_follow(subscriber_id, target_user_id).await?;
    tracing::info!(%subscriber_id, %target_user_id, "unfollow");

    Ok(FollowResult {
        subscriber_id,
        target_user_id,
        status: FollowStatus::Unfollowed,
    })
}

#[entrait(pub ListFollowing, mock_api=ListFollowingMock)]
async fn list_following(deps: &impl FollowRepo, user_id: UserId) -> SocialResult<Vec<UserId>> {
    deps.find_following(user_id).await
}

#[entrait(pub ListFollowers, mock_api=ListFollowersMock)]
async fn list_followers(deps: &impl FollowRepo, user_id: UserId) -> SocialResult<Vec<UserId>> {
    deps.find_followers(user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticateMock, Identity};
    use crate::test::user_id;
    use crate::SystemMock;
    use repo::FollowRepoMock;

    use assert_matches::*;
    use time::OffsetDateTime;
    use unimock::*;

    fn authenticated_as_first_user() -> impl Clause {
        AuthenticateMock.each_call(matching!(_)).answers(&|_, _| {
            Ok(Identity {
                user_id: user_id(1),
                username: "first".to_string(),
                display_name: None,
            })
        })
    }

    #[tokio::test]
    async fn self_follow_should_be_rejected_without_creating_an_edge() {
        // No FollowRepo clauses: any storage call would fail the test.
        let deps = Unimock::new(authenticated_as_first_user());

        assert_matches!(
            follow(&deps, Token::bearer("t0k3n"), user_id(1)).await,
            Err(SocialError::SelfFollowRejected)
        );
    }

    #[tokio::test]
    async fn follow_should_report_existing_edge() {
        let deps = Unimock::new((
            authenticated_as_first_user(),
            SystemMock::get_current_time
                .each_call(matching!())
                .answers(&|_| OffsetDateTime::UNIX_EPOCH),
            FollowRepoMock::insert_follow
                .each_call(matching!(_, _, _))
                .answers(&|_, _, _, _| Ok(FollowStatus::AlreadyFollowing)),
        ));

        let result = follow(&deps, Token::bearer("t0k3n"), user_id(2))
            .await
            .unwrap();

        assert_eq!(
            FollowResult {
                subscriber_id: user_id(1),
                target_user_id: user_id(2),
                status: FollowStatus::AlreadyFollowing,
            },
            result
        );
    }

    #[tokio::test]
    async fn unfollow_should_succeed_whether_or_not_edge_exists() {
        let deps = Unimock::new((
            authenticated_as_first_user(),
            FollowRepoMock::delete_follow
                .each_call(matching!(_, _))
                .answers(&|_, _, _| Ok(())),
        ));

        for _ in 0..2 {
            let result = unfollow(&deps, Token::bearer("t0k3n"), user_id(2))
                .await
                .unwrap();
            assert_eq!(FollowStatus::Unfollowed, result.status);
        }
    }

    #[tokio::test]
    async fn follow_requires_authentication() {
        let deps = Unimock::new(
            AuthenticateMock
                .each_call(matching!(_))
                .answers(&|_, _| Err(SocialError::Unauthenticated)),
        );

        assert_matches!(
            follow(&deps, Token::bearer("garbage"), user_id(2)).await,
            Err(SocialError::Unauthenticated)
        );
    }
}
