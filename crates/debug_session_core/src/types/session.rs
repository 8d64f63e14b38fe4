use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque server-issued session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopReason {
    Breakpoint,
    Step,
    Entry,
    Exited,
    Terminated,
    Error,
    #[default]
    #[serde(other)]
    None,
}

impl StopReason {
    /// The program has run to completion; no further steps are possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Exited | Self::Terminated)
    }
}

/// Execution state of the debuggee as last reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub stopped: bool,
    #[serde(default)]
    pub reason: StopReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<u64>,
}

impl Session {
    /// A running program has no pause location.
    pub fn normalized(mut self) -> Self {
        if !self.stopped {
            self.source_line = None;
            self.source_file = None;
        }
        self
    }

    pub fn is_complete(&self) -> bool {
        self.reason.is_terminal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepCommand {
    #[serde(rename = "next")]
    Next,
    #[serde(rename = "stepIn", alias = "into", alias = "stepInto")]
    StepIn,
    #[serde(rename = "stepOut", alias = "out")]
    StepOut,
    #[serde(rename = "continue")]
    Continue,
}

impl StepCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::StepIn => "stepIn",
            Self::StepOut => "stepOut",
            Self::Continue => "continue",
        }
    }
}

impl fmt::Display for StepCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "next" | "over" | "stepOver" => Ok(Self::Next),
            "stepIn" | "into" | "stepInto" => Ok(Self::StepIn),
            "stepOut" | "out" => Ok(Self::StepOut),
            "continue" => Ok(Self::Continue),
            other => Err(format!(
                "unknown step command '{other}' (expected next, stepIn, stepOut or continue)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub line: u32,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Breakpoint {
    /// A locally added breakpoint, assumed valid until the server says otherwise.
    pub fn optimistic(line: u32) -> Self {
        Self {
            line,
            verified: true,
            message: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub var_type: Option<String>,
}

/// One intermediate value (witness) computed by the program so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueEntry {
    pub index: u32,
    #[serde(default)]
    pub value: String,
}

/// One executed instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub index: u32,
    pub opcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Debug data valid at the current pause point. Replaced wholesale on every refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugDataSnapshot {
    pub variables: Vec<Variable>,
    pub intermediate_values: Vec<ValueEntry>,
    pub instruction_trace: Vec<TraceEntry>,
}

impl DebugDataSnapshot {
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
            && self.intermediate_values.is_empty()
            && self.instruction_trace.is_empty()
    }
}
