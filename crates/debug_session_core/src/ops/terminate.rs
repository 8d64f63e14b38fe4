use crate::types::SessionId;
use crate::DebugClient;

/// Best effort: failures are logged and reported as `false`, never as an error.
pub async fn terminate(client: &DebugClient, session_id: &SessionId) -> bool {
    match client.delete(&["debug", session_id.as_str()]).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to terminate session {}: {}", session_id, e);
            false
        }
    }
}
