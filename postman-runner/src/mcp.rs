use std::sync::Arc;

use postman_runner_core::CollectionRunner;

mod envelope;
mod server;
mod transport;


pub async fn run_stdio(runner: Arc<CollectionRunner>) -> Result<(), String> {
    server::run_stdio(runner).await
}
