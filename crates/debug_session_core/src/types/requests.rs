use super::{SessionId, StepCommand};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Everything the server needs to compile and launch a program under the debugger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub source_code: String,
    /// Extra project files keyed by path, e.g. a manifest or sibling modules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aux_files: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub inputs: Map<String, Value>,
}

impl StartRequest {
    pub fn new(source_code: impl Into<String>) -> Self {
        Self {
            source_code: source_code.into(),
            ..Self::default()
        }
    }

    pub fn with_aux_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.aux_files
            .get_or_insert_with(BTreeMap::new)
            .insert(path.into(), contents.into());
        self
    }

    pub fn with_input(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRequest<'a> {
    pub session_id: &'a SessionId,
    pub command: StepCommand,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakpointLine {
    pub line: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBreakpointsRequest<'a> {
    pub session_id: &'a SessionId,
    pub breakpoints: Vec<BreakpointLine>,
    pub source_file: &'a str,
}

impl<'a> SetBreakpointsRequest<'a> {
    pub fn new(session_id: &'a SessionId, lines: &[u32], source_file: &'a str) -> Self {
        Self {
            session_id,
            breakpoints: lines.iter().map(|&line| BreakpointLine { line }).collect(),
            source_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_start_request_wire_format() {
        let request = StartRequest::new("fn main(x: Field) {}").with_input("x", "3");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "sourceCode": "fn main(x: Field) {}",
                "inputs": {"x": "3"}
            })
        );
    }

    #[test]
    fn test_start_request_includes_aux_files_when_present() {
        let request = StartRequest::new("fn main() {}").with_aux_file("Nargo.toml", "[package]");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["auxFiles"], json!({"Nargo.toml": "[package]"}));
        assert_eq!(value["inputs"], json!({}));
    }

    #[test]
    fn test_step_request_wire_format() {
        let id = SessionId::new("abc");
        let value = serde_json::to_value(StepRequest {
            session_id: &id,
            command: StepCommand::StepOut,
        })
        .unwrap();
        assert_eq!(value, json!({"sessionId": "abc", "command": "stepOut"}));
    }

    #[test]
    fn test_set_breakpoints_sends_full_line_set() {
        let id = SessionId::new("abc");
        let value =
            serde_json::to_value(SetBreakpointsRequest::new(&id, &[3, 7], "main.nr")).unwrap();
        assert_eq!(
            value,
            json!({
                "sessionId": "abc",
                "breakpoints": [{"line": 3}, {"line": 7}],
                "sourceFile": "main.nr"
            })
        );
    }
}
