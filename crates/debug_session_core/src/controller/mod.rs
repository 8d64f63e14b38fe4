//! Stateful orchestration of one interactive debugging session.
//!
//! All mutable state lives behind a single mutex that is never held across an
//! `.await`. Each operation captures the session generation when it starts;
//! a response arriving after the session was stopped or restarted no longer
//! matches and is dropped instead of being applied.

mod reconcile;
mod state;

#[cfg(test)]
mod fake;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use reconcile::BreakpointSet;
pub use state::{ControllerState, ControllerStatus};

use reconcile::{refresh_debug_data, BreakpointSync, SyncResolution};

use crate::error::DebugError;
use crate::transport::SessionTransport;
use crate::types::{Breakpoint, DebugDataSnapshot, Session, SessionId, StartRequest, StepCommand};
use crate::{DebugClient, DebugConfig, Result};

#[derive(Debug, Default)]
struct Inner {
    state: ControllerState,
    session_id: Option<SessionId>,
    session: Option<Session>,
    debug_data: DebugDataSnapshot,
    breakpoints: BreakpointSet,
    last_error: Option<DebugError>,
    generation: u64,
}

impl Inner {
    /// Drops everything tied to the current session. Breakpoints are user
    /// intent and survive.
    fn reset(&mut self, state: ControllerState) {
        self.state = state;
        self.session_id = None;
        self.session = None;
        self.debug_data = DebugDataSnapshot::default();
        self.last_error = None;
    }

    /// Abandons the current session so late responses for it are discarded.
    fn abandon(&mut self, state: ControllerState) -> Option<SessionId> {
        self.state = state;
        self.generation += 1;
        self.session_id.clone()
    }

    fn breakpoint_sync(
        &self,
        desired: BreakpointSet,
        fallback: BreakpointSet,
        default_source_file: &str,
    ) -> Option<BreakpointSync> {
        if !self.state.accepts_breakpoint_sync() {
            return None;
        }
        let session_id = self.session_id.clone()?;
        let source_file = self
            .session
            .as_ref()
            .and_then(|s| s.source_file.clone())
            .unwrap_or_else(|| default_source_file.to_string());

        Some(BreakpointSync {
            generation: self.generation,
            session_id,
            source_file,
            desired,
            fallback,
        })
    }

    fn can_step(&self) -> bool {
        self.state == (ControllerState::Active { paused: true })
            && !self.session.as_ref().is_some_and(Session::is_complete)
    }
}

pub struct SessionController<T: SessionTransport> {
    transport: T,
    config: DebugConfig,
    inner: Mutex<Inner>,
}

impl SessionController<DebugClient> {
    pub fn from_config(config: DebugConfig) -> Result<Self> {
        let client = DebugClient::new(config.clone())?;
        Ok(Self::new(client, config))
    }
}

impl<T: SessionTransport> SessionController<T> {
    pub fn new(transport: T, config: DebugConfig) -> Self {
        Self {
            transport,
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub async fn health_check(&self) -> bool {
        self.transport.health_check().await
    }

    /// Starts a new session. Only accepted from `Idle`.
    pub async fn start(&self, request: &StartRequest) -> bool {
        {
            let mut inner = self.lock();
            if inner.state != ControllerState::Idle {
                tracing::debug!("Rejecting start: controller is {}", inner.state);
                return false;
            }
            inner.state = ControllerState::Starting;
        }

        self.run_start(request).await
    }

    /// Body shared by start and restart; entered in `Starting`.
    async fn run_start(&self, request: &StartRequest) -> bool {
        if !self.transport.health_check().await {
            self.fail_start(DebugError::ServerUnavailable);
            return false;
        }

        let outcome = match self.transport.start(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.fail_start(DebugError::SessionStartFailed(e.to_string()));
                return false;
            }
        };

        // Lifecycle calls are rejected while Starting, so nothing can have
        // moved the controller on by the time the commit below runs.
        let snapshot = refresh_debug_data(&self.transport, &outcome.session_id).await;
        let session = outcome.initial_state.normalized();

        let sync = {
            let mut inner = self.lock();
            inner.state = ControllerState::Active {
                paused: session.stopped,
            };
            inner.session_id = Some(outcome.session_id.clone());
            inner.session = Some(session);
            inner.debug_data = snapshot.unwrap_or_default();
            inner.last_error = None;

            tracing::info!(
                "Debug session {} started ({})",
                outcome.session_id,
                inner.state
            );

            if inner.breakpoints.is_empty() {
                None
            } else {
                let desired = inner.breakpoints.clone();
                let fallback = desired.unconfirmed();
                inner.breakpoint_sync(desired, fallback, &self.config.source_file)
            }
        };

        if let Some(sync) = sync {
            self.sync_breakpoints(sync).await;
        }
        true
    }

    fn fail_start(&self, error: DebugError) {
        tracing::warn!("{}", error);
        let mut inner = self.lock();
        inner.reset(ControllerState::Idle);
        inner.last_error = Some(error);
    }

    /// Runs one step command. Only accepted from `Active`; a second step
    /// while one is in flight is rejected without reaching the transport.
    pub async fn step(&self, command: StepCommand) -> bool {
        let (generation, session_id, paused_before) = {
            let mut inner = self.lock();
            match (inner.state, inner.session_id.clone()) {
                (ControllerState::Active { paused }, Some(session_id)) => {
                    inner.state = ControllerState::Stepping;
                    (inner.generation, session_id, paused)
                }
                (ControllerState::Idle, _) => {
                    tracing::debug!("Rejecting {}: no active session", command);
                    inner.last_error = Some(DebugError::NoActiveSession);
                    return false;
                }
                (state, _) => {
                    tracing::debug!("Rejecting {}: controller is {}", command, state);
                    return false;
                }
            }
        };

        let session = match self.transport.step(&session_id, command).await {
            Ok(session) => session.normalized(),
            Err(e) => {
                let mut inner = self.lock();
                if inner.generation != generation {
                    tracing::debug!(
                        "Discarding {} failure for abandoned session {}",
                        command,
                        session_id
                    );
                    return false;
                }
                tracing::warn!("{} failed for session {}: {}", command, session_id, e);
                inner.state = ControllerState::Active {
                    paused: paused_before,
                };
                inner.last_error = Some(DebugError::StepFailed(e.to_string()));
                return false;
            }
        };

        if self.generation() != generation {
            tracing::debug!(
                "Discarding {} response for abandoned session {}",
                command,
                session_id
            );
            return false;
        }

        let snapshot = refresh_debug_data(&self.transport, &session_id).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(
                "Discarding {} response for abandoned session {}",
                command,
                session_id
            );
            return false;
        }
        inner.state = ControllerState::Active {
            paused: session.stopped,
        };
        if let Some(snapshot) = snapshot {
            inner.debug_data = snapshot;
        }
        tracing::debug!(
            "{} -> line {:?} ({:?})",
            command,
            session.source_line,
            session.reason
        );
        inner.session = Some(session);
        true
    }

    /// Ends the session. Local state always reaches `Idle`, whatever the
    /// server answers to the terminate request.
    pub async fn stop(&self) {
        let session_id = {
            let mut inner = self.lock();
            let state = inner.state;
            match state {
                ControllerState::Active { .. } | ControllerState::Stepping => {
                    inner.abandon(ControllerState::Stopping)
                }
                ControllerState::Idle => {
                    inner.reset(ControllerState::Idle);
                    return;
                }
                state => {
                    tracing::debug!("Rejecting stop: controller is {}", state);
                    return;
                }
            }
        };

        if let Some(session_id) = &session_id {
            self.terminate(session_id).await;
        }

        self.lock().reset(ControllerState::Idle);
        tracing::info!("Debug session stopped");
    }

    /// Terminates the current session and starts a fresh one from `request`.
    pub async fn restart(&self, request: &StartRequest) -> bool {
        let session_id = {
            let mut inner = self.lock();
            let state = inner.state;
            match state {
                ControllerState::Active { .. } | ControllerState::Stepping => {
                    inner.abandon(ControllerState::Restarting)
                }
                state => {
                    tracing::debug!("Rejecting restart: controller is {}", state);
                    return false;
                }
            }
        };

        if let Some(session_id) = &session_id {
            self.terminate(session_id).await;
        }

        if !self.config.restart_settle.is_zero() {
            tokio::time::sleep(self.config.restart_settle).await;
        }

        self.lock().reset(ControllerState::Starting);
        tracing::info!("Restarting debug session");
        self.run_start(request).await
    }

    async fn terminate(&self, session_id: &SessionId) {
        if !self.transport.terminate(session_id).await {
            tracing::warn!("Terminate for session {} was not acknowledged", session_id);
        }
    }

    /// Adds or removes the breakpoint on `line`. Always legal; pushed to the
    /// server only while a session is active.
    pub async fn toggle_breakpoint(&self, line: u32) {
        let sync = {
            let mut inner = self.lock();
            let previous = inner.breakpoints.clone();
            let desired = previous.toggled(line);
            inner.breakpoints = desired.clone();
            tracing::debug!("Breakpoints now {:?}", desired.lines());
            inner.breakpoint_sync(desired, previous, &self.config.source_file)
        };

        if let Some(sync) = sync {
            self.sync_breakpoints(sync).await;
        }
    }

    async fn sync_breakpoints(&self, sync: BreakpointSync) {
        let result = self
            .transport
            .set_breakpoints(&sync.session_id, &sync.lines(), &sync.source_file)
            .await;

        let mut inner = self.lock();
        match sync.resolve(inner.generation, result) {
            SyncResolution::Replace(confirmed) => inner.breakpoints = confirmed,
            SyncResolution::Revert(fallback, error) => {
                inner.breakpoints = fallback;
                inner.last_error = Some(error);
            }
            SyncResolution::Discard => {}
        }
    }

    pub fn clear_error(&self) {
        self.lock().last_error = None;
    }

    pub fn state(&self) -> ControllerState {
        self.lock().state
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.lock().session_id.clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    pub fn current_line(&self) -> Option<u32> {
        self.lock().session.as_ref().and_then(|s| s.source_line)
    }

    pub fn debug_data(&self) -> DebugDataSnapshot {
        self.lock().debug_data.clone()
    }

    pub fn breakpoints(&self) -> Vec<Breakpoint> {
        self.lock().breakpoints.to_vec()
    }

    pub fn last_error(&self) -> Option<DebugError> {
        self.lock().last_error.clone()
    }

    /// Step controls are enabled only while paused in a program that has not
    /// run to completion.
    pub fn can_step(&self) -> bool {
        self.lock().can_step()
    }

    pub fn is_complete(&self) -> bool {
        self.lock()
            .session
            .as_ref()
            .is_some_and(Session::is_complete)
    }

    pub fn status(&self) -> ControllerStatus {
        let inner = self.lock();
        ControllerStatus {
            state: inner.state,
            session_id: inner.session_id.clone(),
            session: inner.session.clone(),
            breakpoints: inner.breakpoints.to_vec(),
            debug_data: inner.debug_data.clone(),
            last_error: inner.last_error.clone(),
            can_step: inner.can_step(),
        }
    }
}
