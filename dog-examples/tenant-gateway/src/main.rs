use anyhow::Result;
use dog_core::DogConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = DogConfig::new();
    config.set("http.host", "127.0.0.1");
    config.set("http.port", "3030");
    config.load_env("DOG__");
    let config = config.snapshot();

    let router = tenant_gateway::build(&config).await?;

    let host = config.get("http.host").unwrap_or("127.0.0.1");
    let port = config.get("http.port").unwrap_or("3030");
    let addr = format!("{host}:{port}");

    println!("[tenant-gateway] listening on http://{addr}");

    router.listen(addr).await?;

    Ok(())
}
