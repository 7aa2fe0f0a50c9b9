mod error;
mod server;

use std::sync::Arc;

use fanboard_blob::DiskBlobStore;
use fanboard_board::{BoardContext, LiveBoard};
use fanboard_store::Store;

#[tokio::main]
async fn main() {
    let port: u16 = env_or("PORT", "3000").parse().expect("invalid PORT");
    let media_dir = env_or("MEDIA_DIR", "media");

    let blobs = DiskBlobStore::open(&media_dir).expect("failed to open media dir");
    let ctx = BoardContext::new(Arc::new(Store::new()), Arc::new(blobs));
    let board = LiveBoard::start(ctx);

    let state = Arc::new(server::AppState { board });
    let app = server::router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    eprintln!("[fanboard] http://localhost:{}", port);
    eprintln!("[fanboard] fanboard-server v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("[fanboard] media dir: {}", media_dir);

    axum::serve(listener, app).await.expect("server error");
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
