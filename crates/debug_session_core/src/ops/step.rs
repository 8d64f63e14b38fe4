use crate::types::{Session, SessionId, StepBody, StepCommand, StepRequest};
use crate::{DebugClient, Result, TransportError};

pub async fn step(
    client: &DebugClient,
    session_id: &SessionId,
    command: StepCommand,
) -> Result<Session> {
    let request = StepRequest {
        session_id,
        command,
    };
    let body: StepBody = client.post(&["debug", "step"], &request).await?;

    body.state.ok_or_else(|| {
        TransportError::InvalidResponse(format!("Missing 'state' in {command} response"))
    })
}
