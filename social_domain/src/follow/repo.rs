use entrait::entrait_export as entrait;
use time::OffsetDateTime;

use super::FollowStatus;
use crate::error::SocialResult;
use crate::UserId;

#[entrait(FollowRepoImpl, delegate_by = DelegateFollowRepo, mock_api = FollowRepoMock)]
pub trait FollowRepo {
    /// Insert the edge unless it already exists.
    ///
    /// Returns `FollowStatus::Followed` when a new edge was created and
    /// `FollowStatus::AlreadyFollowing` otherwise.
    async fn insert_follow(
        &self,
        subscriber_id: UserId,
        target_id: UserId,
        created_at: OffsetDateTime,
    ) -> SocialResult<FollowStatus>;

    async fn delete_follow(&self, subscriber_id: UserId, target_id: UserId) -> SocialResult<()>;

    async fn is_following(&self, subscriber_id: UserId, target_id: UserId) -> SocialResult<bool>;

    /// Targets followed by `user_id`, in the order the edges were created.
    async fn find_following(&self, user_id: UserId) -> SocialResult<Vec<UserId>>;

    /// Subscribers of `user_id`, in the order the edges were created.
    async fn find_followers(&self, user_id: UserId) -> SocialResult<Vec<UserId>>;
}
