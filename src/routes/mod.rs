use axum::{Extension, Router};
use std::path::Path;
use tower_http::services::ServeDir;

use crate::state::ChatState;

pub mod vars;
pub mod ws;

pub fn router() -> Router {
    Router::new()
        .merge(ws::router())
        .merge(vars::router())
}

/// Full application: chat routes plus static assets for everything else.
pub fn app(chat: ChatState, assets_dir: &Path) -> Router {
    router()
        .fallback_service(ServeDir::new(assets_dir))
        .layer(Extension(chat))
}
