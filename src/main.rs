use clap::Parser;
use std::{future::Future, net::SocketAddr, pin::Pin};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wschat::{
    chat::FileRecorder,
    error::AppResult,
    routes, ChatState, Config,
};

type Recorder = Pin<Box<dyn Future<Output = AppResult<()>> + Send>>;

#[tokio::main]
async fn main() -> AppResult<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::parse();
    cfg.validate()?;
    let addr = cfg.socket_addr()?;

    let chat = ChatState::new(cfg.queue_depth, cfg.scrollback);

    // no transcript: a recorder that never finishes
    let recorder: Recorder = match &cfg.transcript {
        Some(path) => Box::pin(FileRecorder::open(path, &chat.broadcaster).await?.run()),
        None       => Box::pin(std::future::pending()),
    };

    let app = routes::app(chat, &cfg.assets_dir)
        .into_make_service_with_connect_info::<SocketAddr>();

    let server = async {
        match cfg.tls() {
            None => {
                let listener = tokio::net::TcpListener::bind(addr).await?;
                info!(address = %addr, "listening");
                axum::serve(listener, app).await?;
            }
            Some((cert, key)) => {
                let tls = axum_server::tls_rustls::RustlsConfig::from_pem_file(cert, key).await?;
                info!(address = %addr, "listening (tls)");
                axum_server::bind_rustls(addr, tls).serve(app).await?;
            }
        }
        AppResult::Ok(())
    };

    tokio::select! {
        r = server   => r,
        r = recorder => {
            if let Err(e) = &r {
                error!("recorder stopped: {e}");
            }
            r
        }
    }
}
