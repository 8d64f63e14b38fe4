//! The seam between the session controller and the debug-adapter server.
//!
//! Every operation returns a `Result` (or a plain `bool` for best-effort
//! calls); nothing panics across this boundary. Retrying is the caller's
//! business, not the transport's.

use async_trait::async_trait;

use crate::ops::{self, data::combine};
use crate::types::{
    Breakpoint, DebugDataSnapshot, Session, SessionId, StartOutcome, StartRequest, StepCommand,
    TraceEntry, ValueEntry, Variable,
};
use crate::{DebugClient, Result};

#[async_trait]
pub trait SessionTransport: Send + Sync {
    async fn start(&self, request: &StartRequest) -> Result<StartOutcome>;

    async fn step(&self, session_id: &SessionId, command: StepCommand) -> Result<Session>;

    async fn fetch_variables(&self, session_id: &SessionId) -> Result<Vec<Variable>>;

    async fn fetch_intermediate_values(&self, session_id: &SessionId) -> Result<Vec<ValueEntry>>;

    async fn fetch_instruction_trace(&self, session_id: &SessionId) -> Result<Vec<TraceEntry>>;

    /// Issues the three collection fetches concurrently.
    async fn fetch_debug_data(&self, session_id: &SessionId) -> Result<DebugDataSnapshot> {
        let (variables, intermediate_values, instruction_trace) = tokio::join!(
            self.fetch_variables(session_id),
            self.fetch_intermediate_values(session_id),
            self.fetch_instruction_trace(session_id),
        );
        combine(variables, intermediate_values, instruction_trace)
    }

    /// Sends the complete desired line set; the server answers with its
    /// verification of every line.
    async fn set_breakpoints(
        &self,
        session_id: &SessionId,
        lines: &[u32],
        source_file: &str,
    ) -> Result<Vec<Breakpoint>>;

    async fn terminate(&self, session_id: &SessionId) -> bool;

    async fn health_check(&self) -> bool;
}

#[async_trait]
impl SessionTransport for DebugClient {
    async fn start(&self, request: &StartRequest) -> Result<StartOutcome> {
        ops::start::start(self, request).await
    }

    async fn step(&self, session_id: &SessionId, command: StepCommand) -> Result<Session> {
        ops::step::step(self, session_id, command).await
    }

    async fn fetch_variables(&self, session_id: &SessionId) -> Result<Vec<Variable>> {
        ops::data::variables(self, session_id).await
    }

    async fn fetch_intermediate_values(&self, session_id: &SessionId) -> Result<Vec<ValueEntry>> {
        ops::data::intermediate_values(self, session_id).await
    }

    async fn fetch_instruction_trace(&self, session_id: &SessionId) -> Result<Vec<TraceEntry>> {
        ops::data::instruction_trace(self, session_id).await
    }

    async fn set_breakpoints(
        &self,
        session_id: &SessionId,
        lines: &[u32],
        source_file: &str,
    ) -> Result<Vec<Breakpoint>> {
        ops::breakpoints::set_breakpoints(self, session_id, lines, source_file).await
    }

    async fn terminate(&self, session_id: &SessionId) -> bool {
        ops::terminate::terminate(self, session_id).await
    }

    async fn health_check(&self) -> bool {
        ops::health::health_check(self).await
    }
}
