use crate::types::{StartBody, StartOutcome, StartRequest};
use crate::{DebugClient, Result};

pub async fn start(client: &DebugClient, request: &StartRequest) -> Result<StartOutcome> {
    let body: StartBody = client.post(&["debug", "start"], request).await?;
    body.into_outcome()
}
