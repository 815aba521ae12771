use std::fmt;

use serde::{Deserialize, Serialize};

/// Review disposition of a persisted possible match. `Pending` is the only
/// state an administrator may transition out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Resolved,
    Dismissed,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Resolved => "resolved",
            ReviewStatus::Dismissed => "dismissed",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(ReviewStatus::Pending),
            "resolved" => Some(ReviewStatus::Resolved),
            "dismissed" => Some(ReviewStatus::Dismissed),
            _ => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ReviewStatus::Resolved | ReviewStatus::Dismissed)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two dispositions an administrator may apply to a pending match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Resolve,
    Dismiss,
}

impl ReviewAction {
    /// Parse an inbound action string. Only the two terminal statuses are
    /// accepted; anything else is an invalid-input error.
    pub fn parse(value: &str) -> Result<Self, ReviewError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "resolved" => Ok(ReviewAction::Resolve),
            "dismissed" => Ok(ReviewAction::Dismiss),
            other => Err(ReviewError::UnknownAction(other.to_string())),
        }
    }

    pub const fn target(self) -> ReviewStatus {
        match self {
            ReviewAction::Resolve => ReviewStatus::Resolved,
            ReviewAction::Dismiss => ReviewStatus::Dismissed,
        }
    }
}

/// Errors raised while dispositioning a match.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("'{0}' is not a valid review disposition; expected 'resolved' or 'dismissed'")]
    UnknownAction(String),
    #[error("match was already reviewed as {current}")]
    AlreadyReviewed { current: ReviewStatus },
}

/// Apply an administrator action to the current review status. Both targets
/// are terminal, so a reviewed match can never be re-dispositioned.
pub fn transition(current: ReviewStatus, action: ReviewAction) -> Result<ReviewStatus, ReviewError> {
    match current {
        ReviewStatus::Pending => Ok(action.target()),
        reviewed => Err(ReviewError::AlreadyReviewed { current: reviewed }),
    }
}

/// Standing of a reported user, governed separately from match review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStanding {
    Active,
    Warned,
    Suspended,
}

impl UserStanding {
    pub const fn label(self) -> &'static str {
        match self {
            UserStanding::Active => "active",
            UserStanding::Warned => "warned",
            UserStanding::Suspended => "suspended",
        }
    }

    /// Apply an allow-listed moderation action. Only `active` users can have
    /// their standing changed.
    pub fn apply(self, action: &str) -> Result<UserStanding, StandingError> {
        let target = match action.trim().to_ascii_lowercase().as_str() {
            "warn" => UserStanding::Warned,
            "suspend" => UserStanding::Suspended,
            other => return Err(StandingError::UnknownAction(other.to_string())),
        };

        match self {
            UserStanding::Active => Ok(target),
            current => Err(StandingError::NotActive { current }),
        }
    }
}

impl fmt::Display for UserStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors raised while moderating a user's standing.
#[derive(Debug, thiserror::Error)]
pub enum StandingError {
    #[error("'{0}' is not an allowed standing action; expected 'warn' or 'suspend'")]
    UnknownAction(String),
    #[error("standing can only change while a user is active (currently {current})")]
    NotActive { current: UserStanding },
}
