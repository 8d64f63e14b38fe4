use serde::Serialize;
use std::fmt;

use crate::error::DebugError;
use crate::types::{Breakpoint, DebugDataSnapshot, Session, SessionId};

/// Lifecycle tag of a [`SessionController`](super::SessionController).
///
/// The tag doubles as the single-flight guard: a lifecycle call is only
/// accepted from the states listed on its transition, everything else is
/// rejected rather than queued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControllerState {
    #[default]
    Idle,
    Starting,
    /// `paused` mirrors `Session::stopped`.
    Active { paused: bool },
    Stepping,
    Stopping,
    Restarting,
}

impl ControllerState {
    /// States in which a confirmed session id exists.
    pub fn holds_session(self) -> bool {
        matches!(
            self,
            Self::Active { .. } | Self::Stepping | Self::Stopping | Self::Restarting
        )
    }

    /// States in which breakpoint changes are pushed to the server.
    pub fn accepts_breakpoint_sync(self) -> bool {
        matches!(self, Self::Active { .. } | Self::Stepping)
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Starting => write!(f, "starting"),
            Self::Active { paused: true } => write!(f, "active (paused)"),
            Self::Active { paused: false } => write!(f, "active (running)"),
            Self::Stepping => write!(f, "stepping"),
            Self::Stopping => write!(f, "stopping"),
            Self::Restarting => write!(f, "restarting"),
        }
    }
}

/// Everything presentation code reads, captured under one lock.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerStatus {
    pub state: ControllerState,
    pub session_id: Option<SessionId>,
    pub session: Option<Session>,
    pub breakpoints: Vec<Breakpoint>,
    pub debug_data: DebugDataSnapshot,
    #[serde(serialize_with = "serialize_error")]
    pub last_error: Option<DebugError>,
    pub can_step: bool,
}

fn serialize_error<S: serde::Serializer>(
    error: &Option<DebugError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_some(&error.to_string()),
        None => serializer.serialize_none(),
    }
}
