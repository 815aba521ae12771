use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use super::domain::UserId;
use super::repository::NotificationGateway;

const MATCH_SUBJECT: &str = "Possible match identified";

/// Sends exactly one notification per unique owner of a matched record per
/// run. Recipient order follows the ranked matches (first occurrence wins);
/// a failed send is logged and the remaining recipients still get theirs.
pub struct NotificationDispatcher<N> {
    gateway: Arc<N>,
}

impl<N> NotificationDispatcher<N>
where
    N: NotificationGateway,
{
    pub fn new(gateway: Arc<N>) -> Self {
        Self { gateway }
    }

    /// Returns the number of notifications delivered.
    pub fn notify_owners(&self, source_name: &str, owners: &[UserId]) -> usize {
        let mut seen = HashSet::new();
        let mut delivered = 0;

        let message = format!(
            "A record possibly matching {source_name} was identified. \
             Review the proposed match in your dashboard."
        );

        for owner in owners {
            if !seen.insert(owner.clone()) {
                continue;
            }
            match self.gateway.send(owner, MATCH_SUBJECT, &message) {
                Ok(()) => delivered += 1,
                Err(err) => warn!(
                    recipient = %owner.0,
                    %err,
                    "failed to notify match owner, continuing with remaining recipients"
                ),
            }
        }

        delivered
    }
}
