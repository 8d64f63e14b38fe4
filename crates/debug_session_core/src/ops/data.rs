use crate::types::{
    DebugDataSnapshot, OpcodesBody, SessionId, TraceEntry, ValueEntry, Variable, VariablesBody,
    WitnessBody,
};
use crate::{DebugClient, Result, TransportError};

pub async fn variables(client: &DebugClient, session_id: &SessionId) -> Result<Vec<Variable>> {
    let body: VariablesBody = client.get(&["debug", "variables", session_id.as_str()]).await?;
    Ok(body.variables.unwrap_or_default())
}

pub async fn intermediate_values(
    client: &DebugClient,
    session_id: &SessionId,
) -> Result<Vec<ValueEntry>> {
    let body: WitnessBody = client.get(&["debug", "witness", session_id.as_str()]).await?;
    Ok(body.witnesses.unwrap_or_default())
}

pub async fn instruction_trace(
    client: &DebugClient,
    session_id: &SessionId,
) -> Result<Vec<TraceEntry>> {
    let body: OpcodesBody = client.get(&["debug", "opcodes", session_id.as_str()]).await?;
    Ok(body.opcodes.unwrap_or_default())
}

/// Combines the three collection fetches. Fails as a unit, listing every
/// fetch that failed; there is no transactional guarantee on the server.
pub fn combine(
    variables: Result<Vec<Variable>>,
    intermediate_values: Result<Vec<ValueEntry>>,
    instruction_trace: Result<Vec<TraceEntry>>,
) -> Result<DebugDataSnapshot> {
    match (variables, intermediate_values, instruction_trace) {
        (Ok(variables), Ok(intermediate_values), Ok(instruction_trace)) => Ok(DebugDataSnapshot {
            variables,
            intermediate_values,
            instruction_trace,
        }),
        (variables, intermediate_values, instruction_trace) => {
            let errors = [
                variables.err(),
                intermediate_values.err(),
                instruction_trace.err(),
            ]
            .into_iter()
            .flatten()
            .collect();
            Err(TransportError::DebugData(errors))
        }
    }
}
