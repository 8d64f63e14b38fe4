use super::{Breakpoint, Session, SessionId, TraceEntry, ValueEntry, Variable};
use crate::{Result, TransportError};
use serde::Deserialize;

/// Envelope shared by every JSON response: `{success, error?, ...payload}`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub body: T,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<T> {
        if self.success {
            Ok(self.body)
        } else {
            Err(TransportError::Server(
                self.error
                    .unwrap_or_else(|| "unknown server error".to_string()),
            ))
        }
    }
}

/// Body of an error response, used when the HTTP status is not 2xx.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBody {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default)]
    pub initial_state: Option<Session>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartOutcome {
    pub session_id: SessionId,
    pub initial_state: Session,
}

impl StartBody {
    pub fn into_outcome(self) -> Result<StartOutcome> {
        let session_id = self.session_id.ok_or_else(|| {
            TransportError::InvalidResponse("Missing 'sessionId' in start response".into())
        })?;
        let initial_state = self.initial_state.ok_or_else(|| {
            TransportError::InvalidResponse("Missing 'initialState' in start response".into())
        })?;
        Ok(StartOutcome {
            session_id,
            initial_state,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StepBody {
    #[serde(default)]
    pub state: Option<Session>,
}

#[derive(Debug, Deserialize)]
pub struct VariablesBody {
    #[serde(default)]
    pub variables: Option<Vec<Variable>>,
}

#[derive(Debug, Deserialize)]
pub struct WitnessBody {
    #[serde(default)]
    pub witnesses: Option<Vec<ValueEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct OpcodesBody {
    #[serde(default)]
    pub opcodes: Option<Vec<TraceEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct BreakpointsBody {
    #[serde(default)]
    pub breakpoints: Option<Vec<Breakpoint>>,
}
