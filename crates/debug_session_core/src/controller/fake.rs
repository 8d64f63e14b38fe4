//! Scripted transport used by the controller tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{oneshot, Notify};

use crate::transport::SessionTransport;
use crate::types::{
    Breakpoint, Session, SessionId, StartOutcome, StartRequest, StepCommand, StopReason,
    TraceEntry, ValueEntry, Variable,
};
use crate::{Result, TransportError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Health,
    Start(String),
    Step(SessionId, StepCommand),
    Variables(SessionId),
    IntermediateValues(SessionId),
    InstructionTrace(SessionId),
    SetBreakpoints(SessionId, Vec<u32>, String),
    Terminate(SessionId),
}

/// Holds one call at a time until the test releases it.
#[derive(Default)]
pub(crate) struct Gate {
    /// Signalled every time the gated call reaches the transport.
    pub entered: Notify,
    release: Mutex<Option<oneshot::Receiver<()>>>,
}

impl Gate {
    /// Holds the next call until the returned sender fires.
    pub fn hold(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.release.lock().unwrap() = Some(rx);
        tx
    }

    async fn pass(&self) {
        self.entered.notify_one();
        let release = self.release.lock().unwrap().take();
        if let Some(release) = release {
            let _ = release.await;
        }
    }
}

pub(crate) struct FakeTransport {
    pub healthy: AtomicBool,
    pub terminate_ok: AtomicBool,
    pub fail_variables: AtomicBool,
    pub fail_breakpoints: AtomicBool,
    pub unverified_lines: Mutex<Vec<u32>>,
    pub variables: Mutex<Vec<Variable>>,
    pub health_gate: Gate,
    pub step_gate: Gate,
    pub terminate_gate: Gate,
    starts: Mutex<VecDeque<Result<StartOutcome>>>,
    steps: Mutex<VecDeque<Result<Session>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            healthy: AtomicBool::new(true),
            terminate_ok: AtomicBool::new(true),
            fail_variables: AtomicBool::new(false),
            fail_breakpoints: AtomicBool::new(false),
            unverified_lines: Mutex::new(Vec::new()),
            variables: Mutex::new(vec![variable("x", "1")]),
            health_gate: Gate::default(),
            step_gate: Gate::default(),
            terminate_gate: Gate::default(),
            starts: Mutex::new(VecDeque::new()),
            steps: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push_start(&self, result: Result<StartOutcome>) {
        self.starts.lock().unwrap().push_back(result);
    }

    pub fn push_started(&self, session_id: &str, initial_state: Session) {
        self.push_start(Ok(StartOutcome {
            session_id: SessionId::new(session_id),
            initial_state,
        }));
    }

    pub fn push_step(&self, result: Result<Session>) {
        self.steps.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub(crate) fn variable(name: &str, value: &str) -> Variable {
    Variable {
        name: name.to_string(),
        value: value.to_string(),
        var_type: Some("Field".to_string()),
    }
}

pub(crate) fn paused_at(line: u32, reason: StopReason) -> Session {
    Session {
        stopped: true,
        reason,
        source_line: Some(line),
        source_file: Some("main.nr".to_string()),
        frame_id: Some(0),
        thread_id: Some(1),
    }
}

#[async_trait]
impl SessionTransport for FakeTransport {
    async fn start(&self, request: &StartRequest) -> Result<StartOutcome> {
        self.record(Call::Start(request.source_code.clone()));
        self.starts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::server("no scripted start")))
    }

    async fn step(&self, session_id: &SessionId, command: StepCommand) -> Result<Session> {
        self.record(Call::Step(session_id.clone(), command));
        self.step_gate.pass().await;

        self.steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::server("no scripted step")))
    }

    async fn fetch_variables(&self, session_id: &SessionId) -> Result<Vec<Variable>> {
        self.record(Call::Variables(session_id.clone()));
        if self.fail_variables.load(Ordering::SeqCst) {
            return Err(TransportError::server("variables unavailable"));
        }
        Ok(self.variables.lock().unwrap().clone())
    }

    async fn fetch_intermediate_values(&self, session_id: &SessionId) -> Result<Vec<ValueEntry>> {
        self.record(Call::IntermediateValues(session_id.clone()));
        Ok(vec![ValueEntry {
            index: 0,
            value: "0x01".to_string(),
        }])
    }

    async fn fetch_instruction_trace(&self, session_id: &SessionId) -> Result<Vec<TraceEntry>> {
        self.record(Call::InstructionTrace(session_id.clone()));
        Ok(vec![TraceEntry {
            index: 0,
            opcode: "ASSERT_ZERO".to_string(),
            location: None,
        }])
    }

    async fn set_breakpoints(
        &self,
        session_id: &SessionId,
        lines: &[u32],
        source_file: &str,
    ) -> Result<Vec<Breakpoint>> {
        self.record(Call::SetBreakpoints(
            session_id.clone(),
            lines.to_vec(),
            source_file.to_string(),
        ));
        if self.fail_breakpoints.load(Ordering::SeqCst) {
            return Err(TransportError::server("breakpoint sync rejected"));
        }

        let unverified = self.unverified_lines.lock().unwrap().clone();
        Ok(lines
            .iter()
            .map(|&line| {
                let verified = !unverified.contains(&line);
                Breakpoint {
                    line,
                    verified,
                    message: (!verified).then(|| "no code at line".to_string()),
                }
            })
            .collect())
    }

    async fn terminate(&self, session_id: &SessionId) -> bool {
        self.record(Call::Terminate(session_id.clone()));
        self.terminate_gate.pass().await;
        self.terminate_ok.load(Ordering::SeqCst)
    }

    async fn health_check(&self) -> bool {
        self.record(Call::Health);
        self.health_gate.pass().await;
        self.healthy.load(Ordering::SeqCst)
    }
}
