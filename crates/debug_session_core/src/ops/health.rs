use crate::DebugClient;

pub async fn health_check(client: &DebugClient) -> bool {
    match client.probe(&["debug", "health"]).await {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Health check failed: {}", e);
            false
        }
    }
}
