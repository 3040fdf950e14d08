use axum::{
    extract::{
        ws::{Message as Frame, WebSocket, WebSocketUpgrade},
        ConnectInfo, Extension,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use std::net::SocketAddr;
use tracing::{debug, info};

use crate::{
    chat::{Message, Sink, SinkId},
    state::ChatState,
};

pub fn router() -> Router {
    Router::new().route("/chat", get(ws_handler))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Extension(chat): Extension<ChatState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |s| user_ws(s, addr, chat))
}

/* ---------------- per connection ---------------- */
async fn user_ws(sock: WebSocket, addr: SocketAddr, chat: ChatState) {
    let nick = chat.nicks.generate(&addr.to_string());
    info!(%addr, %nick, "connection opened");

    // register before taking the snapshot so nothing falls between the two
    let mut sink = chat.broadcaster.new_sink();
    let id = sink.id();
    let (mut tx, rx) = sock.split();

    let reader = tokio::spawn(read_loop(rx, id, nick.clone(), chat.clone()));
    write_loop(&mut tx, &mut sink, &chat).await;

    chat.broadcaster.del_sink(id);
    reader.abort();
    info!(%addr, %nick, "connection closed");
}

/// Client frames into the broadcaster. Ends on close, error or EOF.
async fn read_loop(mut rx: SplitStream<WebSocket>, id: SinkId, nick: String, chat: ChatState) {
    while let Some(frame) = rx.next().await {
        match frame {
            Ok(Frame::Text(text)) => {
                chat.stats.add_in();
                chat.broadcaster.broadcast(&Message::new(text, nick.as_str()));
            }
            Ok(Frame::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(%nick, "read failed: {e}");
                break;
            }
        }
    }
    // closes the sink, which ends write_loop
    chat.broadcaster.del_sink(id);
}

/// Scroll-back first, then live messages until the sink closes or a send fails.
async fn write_loop(tx: &mut SplitSink<WebSocket, Frame>, sink: &mut Sink, chat: &ChatState) {
    for msg in chat.scrollback.snapshot() {
        if tx.send(Frame::Text(msg.to_string())).await.is_err() {
            return;
        }
        chat.stats.add_out();
    }
    while let Some(msg) = sink.recv().await {
        if tx.send(Frame::Text(msg.to_string())).await.is_err() {
            return;
        }
        chat.stats.add_out();
    }
    let _ = tx.close().await;
}
