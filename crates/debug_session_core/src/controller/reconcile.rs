//! Breakpoint optimistic-update/rollback and post-step data refresh.
//!
//! Breakpoint sync is two-phase: the desired set is applied locally first,
//! then either replaced by the server's authoritative answer or reverted.
//! The local set is never patched line by line. Concurrent toggles each send
//! a full set, so whichever response arrives last wins.

use std::collections::BTreeMap;

use crate::error::DebugError;
use crate::transport::SessionTransport;
use crate::types::{Breakpoint, DebugDataSnapshot, SessionId};
use crate::Result;

const UNCONFIRMED_MESSAGE: &str = "not confirmed by server";

/// Client-owned breakpoints, one per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakpointSet {
    by_line: BTreeMap<u32, Breakpoint>,
}

impl BreakpointSet {
    /// Adds `line` optimistically, or removes it if already present.
    pub fn toggled(&self, line: u32) -> Self {
        let mut next = self.clone();
        if next.by_line.remove(&line).is_none() {
            next.by_line.insert(line, Breakpoint::optimistic(line));
        }
        next
    }

    /// Takes the server's answer verbatim.
    pub fn from_confirmed(breakpoints: Vec<Breakpoint>) -> Self {
        Self {
            by_line: breakpoints.into_iter().map(|bp| (bp.line, bp)).collect(),
        }
    }

    /// Same lines, none of them verified.
    pub fn unconfirmed(&self) -> Self {
        Self {
            by_line: self
                .by_line
                .keys()
                .map(|&line| {
                    let bp = Breakpoint {
                        line,
                        verified: false,
                        message: Some(UNCONFIRMED_MESSAGE.to_string()),
                    };
                    (line, bp)
                })
                .collect(),
        }
    }

    pub fn contains(&self, line: u32) -> bool {
        self.by_line.contains_key(&line)
    }

    pub fn get(&self, line: u32) -> Option<&Breakpoint> {
        self.by_line.get(&line)
    }

    pub fn lines(&self) -> Vec<u32> {
        self.by_line.keys().copied().collect()
    }

    pub fn to_vec(&self) -> Vec<Breakpoint> {
        self.by_line.values().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }
}

/// What to do with the local breakpoint set once a sync response is in.
#[derive(Debug, PartialEq)]
pub(crate) enum SyncResolution {
    Replace(BreakpointSet),
    Revert(BreakpointSet, DebugError),
    /// The session that issued the request is gone.
    Discard,
}

/// An in-flight breakpoint sync, tied to the session generation it was sent for.
#[derive(Debug, Clone)]
pub(crate) struct BreakpointSync {
    pub generation: u64,
    pub session_id: SessionId,
    pub source_file: String,
    pub desired: BreakpointSet,
    pub fallback: BreakpointSet,
}

impl BreakpointSync {
    pub fn lines(&self) -> Vec<u32> {
        self.desired.lines()
    }

    pub fn resolve(
        self,
        current_generation: u64,
        result: Result<Vec<Breakpoint>>,
    ) -> SyncResolution {
        if current_generation != self.generation {
            tracing::debug!(
                "Discarding breakpoint response for abandoned session {}",
                self.session_id
            );
            return SyncResolution::Discard;
        }

        match result {
            Ok(confirmed) => SyncResolution::Replace(BreakpointSet::from_confirmed(confirmed)),
            Err(e) => {
                tracing::warn!("Breakpoint sync for session {} failed: {}", self.session_id, e);
                SyncResolution::Revert(
                    self.fallback,
                    DebugError::BreakpointSyncFailed(e.to_string()),
                )
            }
        }
    }
}

/// Best-effort refresh: stale data is kept by the caller when this returns `None`.
pub(crate) async fn refresh_debug_data<T: SessionTransport + ?Sized>(
    transport: &T,
    session_id: &SessionId,
) -> Option<DebugDataSnapshot> {
    match transport.fetch_debug_data(session_id).await {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!("Debug data refresh for session {} failed: {}", session_id, e);
            None
        }
    }
}
