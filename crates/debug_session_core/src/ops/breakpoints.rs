use crate::types::{Breakpoint, BreakpointsBody, SessionId, SetBreakpointsRequest};
use crate::{DebugClient, Result};

/// Replaces the server's breakpoint set for `source_file` with exactly `lines`.
pub async fn set_breakpoints(
    client: &DebugClient,
    session_id: &SessionId,
    lines: &[u32],
    source_file: &str,
) -> Result<Vec<Breakpoint>> {
    let request = SetBreakpointsRequest::new(session_id, lines, source_file);
    let body: BreakpointsBody = client.post(&["debug", "breakpoints"], &request).await?;
    Ok(body.breakpoints.unwrap_or_default())
}
