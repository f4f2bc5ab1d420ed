//! Screen-level errors, notices and completion outcomes.

use crate::store::durable_store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of a user action, handled at the screen boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// Commit attempted with an empty or whitespace-only draft.
    Validation,
    /// Storage call failed; no mirror was updated.
    StorageUnavailable(String),
    /// A storage call from this controller is still outstanding.
    ActionPending,
    /// `on_mount` was already called for this controller.
    AlreadyMounted,
}

impl ScreenError {
    /// Notice to show the user for this error, if any.
    ///
    /// `ActionPending` and `AlreadyMounted` are runtime misuse; the action is
    /// simply ignored from the user's point of view.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Validation => Some(Notice::EmptyInput),
            Self::StorageUnavailable(_) => Some(Notice::StorageFailure),
            Self::ActionPending | Self::AlreadyMounted => None,
        }
    }
}

impl Display for ScreenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "draft is empty"),
            Self::StorageUnavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::ActionPending => write!(f, "another storage action is still pending"),
            Self::AlreadyMounted => write!(f, "screen is already mounted"),
        }
    }
}

impl Error for ScreenError {}

impl From<StoreError> for ScreenError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::StorageUnavailable(reason) => Self::StorageUnavailable(reason),
            StoreError::InvalidKey(key) => {
                Self::StorageUnavailable(format!("invalid storage key `{key}`"))
            }
        }
    }
}

/// User-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Blocking notice for an empty commit.
    EmptyInput,
    /// Confirmation after a successful delete.
    Deleted,
    /// Generic failure for any unavailable storage.
    StorageFailure,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Self::EmptyInput => "Please enter some text.",
            Self::Deleted => "Text removed from storage.",
            Self::StorageFailure => "Storage is unavailable. Please try again.",
        }
    }

    /// Whether the UI should block until the user dismisses it.
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::EmptyInput)
    }
}

/// Outcome of a storage-backed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    /// Result was applied to controller state.
    Applied(T),
    /// The view was torn down; the result was dropped.
    Discarded,
}

impl<T> Completion<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Discarded => None,
        }
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, Self::Discarded)
    }
}

#[cfg(test)]
mod tests {
    use super::{Notice, ScreenError};
    use crate::store::durable_store::StoreError;

    #[test]
    fn errors_map_to_notices() {
        assert_eq!(ScreenError::Validation.notice(), Some(Notice::EmptyInput));
        assert_eq!(
            ScreenError::from(StoreError::StorageUnavailable("down".to_string())).notice(),
            Some(Notice::StorageFailure)
        );
        assert_eq!(ScreenError::ActionPending.notice(), None);
    }

    #[test]
    fn only_validation_notice_blocks() {
        assert!(Notice::EmptyInput.is_blocking());
        assert!(!Notice::Deleted.is_blocking());
        assert!(!Notice::StorageFailure.is_blocking());
    }
}
