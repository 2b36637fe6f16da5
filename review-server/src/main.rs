mod verifier;

use std::time::Duration;

use clap::Parser;
use review::{
    store::{MemoryStore, Store},
    ConfigBuilder, Reviews, StaticVerifier, DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_COMMENT_LEN,
    DEFAULT_MAX_PRODUCT_ID_LEN,
};
use review_axum::{router, AppState};
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::verifier::HttpVerifier;

#[derive(Parser, Debug)]
#[command(name = "review-server")]
#[command(about = "Product review and rating service")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "REVIEWS_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, env = "REVIEWS_PORT", default_value_t = 3000)]
    port: u16,

    /// Postgres connection string, reviews are kept in memory when absent
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Auth service endpoint resolving bearer tokens to `{id, name}`
    #[arg(long, env = "AUTH_URL")]
    auth_url: Option<String>,

    /// Fixed tokens as `token:id:name,...`, used when no auth url is set
    #[arg(long, env = "REVIEWS_TOKENS", default_value = "")]
    tokens: String,

    #[arg(long, env = "REVIEWS_AUTH_TIMEOUT_SECS", default_value_t = 5)]
    auth_timeout_secs: u64,

    #[arg(long, env = "REVIEWS_MAX_BATCH_SIZE", default_value_t = DEFAULT_MAX_BATCH_SIZE)]
    max_batch_size: usize,

    #[arg(long, env = "REVIEWS_MAX_COMMENT_LEN", default_value_t = DEFAULT_MAX_COMMENT_LEN)]
    max_comment_len: usize,

    #[arg(long, env = "REVIEWS_MAX_PRODUCT_ID_LEN", default_value_t = DEFAULT_MAX_PRODUCT_ID_LEN)]
    max_product_id_len: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = ConfigBuilder::new()
        .batch_size(args.max_batch_size)
        .comment_len(args.max_comment_len)
        .product_id_len(args.max_product_id_len)
        .build();

    let reviews = Reviews::with_config(create_store(&args).await?, config);

    let state = match &args.auth_url {
        Some(url) => {
            info!("Verifying tokens against {url}");

            AppState::new(
                reviews,
                HttpVerifier::new(url, Duration::from_secs(args.auth_timeout_secs))?,
            )
        }
        None => {
            let verifier = StaticVerifier::parse(&args.tokens)?;

            if verifier.is_empty() {
                warn!("No auth url nor tokens configured, review submissions will be rejected");
            } else {
                info!("Verifying tokens against {} static entries", verifier.len());
            }

            AppState::new(reviews, verifier)
        }
    };

    let address = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&address).await?;

    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

#[cfg(feature = "pg")]
async fn create_store(args: &Args) -> anyhow::Result<Store> {
    use review::store::PgStore;
    use sqlx::PgPool;

    let Some(url) = &args.database_url else {
        info!("Using in-memory store");

        return Ok(MemoryStore::new());
    };

    let pool = PgPool::connect(url).await?;
    PgStore::migrate(&pool, None).await?;

    info!("Using postgres store");

    Ok(PgStore::new(&pool))
}

#[cfg(not(feature = "pg"))]
async fn create_store(args: &Args) -> anyhow::Result<Store> {
    if args.database_url.is_some() {
        anyhow::bail!("a database url needs the server built with the `pg` feature");
    }

    info!("Using in-memory store");

    Ok(MemoryStore::new())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = ctrl_c().await {
            error!("failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(err) => {
                error!("failed to install terminate handler: {err}");
                std::future::pending::<()>().await;
            }
        }

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["review-server"]).unwrap();

        assert_eq!(args.port, 3000);
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.max_batch_size, 100);
        assert_eq!(args.max_comment_len, 2000);
        assert_eq!(args.max_product_id_len, 128);
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "review-server",
            "-p",
            "8080",
            "--tokens",
            "t1:u-1:Jane",
            "--max-batch-size",
            "10",
        ])
        .unwrap();

        assert_eq!(args.port, 8080);
        assert_eq!(args.tokens, "t1:u-1:Jane");
        assert_eq!(args.max_batch_size, 10);
    }
}
