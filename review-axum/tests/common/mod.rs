use review::{store::MemoryStore, ConfigBuilder, Identity, Reviews, StaticVerifier};
use review_axum::{router, AppState};
use review_client::{ClientConfig, RatingsClient};
use tokio::net::TcpListener;

pub const JOHN: &str = "john-token";
pub const ALBERT: &str = "albert-token";

/// Serves a fresh in-memory app on an ephemeral port and returns its base url.
pub async fn spawn_app() -> String {
    let reviews = Reviews::with_config(
        MemoryStore::new(),
        ConfigBuilder::new().batch_size(3).build(),
    );

    let verifier = StaticVerifier::new()
        .token(JOHN, Identity::new("u-john", "John Doe"))
        .token(ALBERT, Identity::new("u-albert", "Albert"));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router(AppState::new(reviews, verifier)))
            .await
            .unwrap();
    });

    format!("http://{addr}")
}

pub fn client(base_url: &str) -> RatingsClient {
    RatingsClient::new(&ClientConfig::new(base_url)).unwrap()
}
