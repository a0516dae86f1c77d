use jsonrpc_retry::ServiceClient;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    // JSONRPC_SERVICE_ADDR=http://127.0.0.1:8080/rpc JSONRPC_MAX_RETRIES=3
    let rpc = ServiceClient::from_env()?;

    let sum: i64 = rpc.call("Arith.Add", &json!({"a": 20, "b": 22})).await?;
    println!("Arith.Add -> {sum}");

    let mut echoed = String::new();
    rpc.call_into("Echo.Say", "hello", &mut echoed).await?;
    println!("Echo.Say -> {echoed}");

    Ok(())
}
