use flipmatch_server::FlipmatchServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("FLIPMATCH_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let server = FlipmatchServerBuilder::new().bind(&addr).build().await?;
    tracing::info!(addr = %server.local_addr()?, "listening");

    server.run().await?;
    Ok(())
}
