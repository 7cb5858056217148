//! Everything a user detail view shows, fetched in one go

use crate::api::channels::Channel;
use crate::api::client::AdminClient;
use crate::api::packages::Package;
use crate::api::subscriptions::Subscription;
use crate::api::users::User;
use crate::error::Result;
use futures_util::future::try_join4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOverview {
    pub user: User,
    pub subscriptions: Vec<Subscription>,
    pub packages: Vec<Package>,
    /// Direct channel assignments only.
    pub channels: Vec<Channel>,
}

impl AdminClient {
    /// Fetch a user with its subscriptions, packages and direct channels.
    ///
    /// The four reads are issued concurrently as independent requests.
    ///
    /// # Errors
    /// The first failing read's error
    pub async fn user_overview(&self, user_id: i64) -> Result<UserOverview> {
        let (user, subscriptions, packages, channels) = try_join4(
            self.get_user(user_id),
            self.list_subscriptions(user_id),
            self.get_user_packages(user_id),
            self.get_user_channels(user_id),
        )
        .await?;

        Ok(UserOverview {
            user,
            subscriptions,
            packages,
            channels,
        })
    }
}
