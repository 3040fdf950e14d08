use axum::{routing::get, Extension, Json, Router};

use crate::{chat::StatsSnapshot, state::ChatState};

pub fn router() -> Router {
    Router::new().route("/debug/vars", get(vars))
}

async fn vars(Extension(chat): Extension<ChatState>) -> Json<StatsSnapshot> {
    Json(chat.stats.snapshot())
}
