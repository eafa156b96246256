use std::time::Instant;

use crate::dispatch::Command;

/// Command awaiting a y/N answer.
pub struct PendingAction {
    pub description: String,
    pub kind: PendingActionKind,
    pub expires: Instant,
}

pub enum PendingActionKind {
    Dispatch(Command),
    RefreshSubscription,
}

/// Blocking message shown until any key is pressed.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { message: message.into(), is_error: false }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { message: message.into(), is_error: true }
    }
}
