use mock_server::DEFAULT_RATE_LIMIT;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let limit = std::env::var("RATE_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_RATE_LIMIT);
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("menus API mock listening on {addr} (rate limit {limit}/day)");
    axum::serve(listener, mock_server::app_with_limit(limit)).await
}
