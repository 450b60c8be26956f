mod config;

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{stream::StreamExt, SinkExt};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use card24_core::{ClientMessage, ServerMessage, Session};

use crate::config::ServerConfig;

// 服务器全局状态只保存配置，每个连接的牌局互不共享
struct AppState {
    seed: Option<u64>,
}

type SharedState = Arc<AppState>;

// 每个连接独立的一局游戏，SessionId 只用于日志
type SessionId = Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    if let Some(seed) = config.seed {
        info!("使用固定随机种子 {}", seed);
    }

    let state = SharedState::new(AppState { seed: config.seed });

    let app = Router::new()
        .route("/ws", get(websocket_handler))
        .with_state(state);

    info!("服务器正在监听 {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// 处理 WebSocket 连接请求
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// 处理单个 WebSocket 连接的生命周期
async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();

    // 创建一个 MPSC 通道，用于把要发送的消息交给写任务
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(32);

    // 启动一个新任务，专门负责将 MPSC 通道中的消息发送到 WebSocket
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let payload = match serde_json::to_string(&msg) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!("序列化消息失败: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(payload.into())).await.is_err() {
                // 发送失败，说明客户端已断开，退出任务
                break;
            }
        }
    });

    let session_id: SessionId = Uuid::new_v4();
    let mut session = match state.seed {
        Some(seed) => Session::with_seed(seed),
        None => Session::new(),
    };
    info!("牌局 {} 开始，手牌: {}", session_id, describe_hand(&session));
    let _ = tx.send(ServerMessage::SessionSnapshot(session.snapshot())).await;

    // 主循环，处理从客户端接收到的消息
    while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Text(text) = msg {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    for reply in handle_client_message(&mut session, session_id, client_msg) {
                        if tx.send(reply).await.is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("牌局 {} 解析消息失败: {}", session_id, e);
                }
            }
        }
    }

    info!("牌局 {} 的客户端连接关闭", session_id);
}

/// 核心消息处理逻辑：转交给牌局，并记录关键事件
fn handle_client_message(
    session: &mut Session,
    session_id: SessionId,
    msg: ClientMessage,
) -> Vec<ServerMessage> {
    let is_restart = matches!(msg, ClientMessage::Restart);
    let combined_before = session.history().len();

    let replies = session.handle(msg);

    if is_restart {
        info!("牌局 {} 重新开局，手牌: {}", session_id, describe_hand(session));
    }
    if session.history().len() > combined_before {
        if let Some(step) = session.history().last() {
            info!("牌局 {} 运算: {}", session_id, step);
        }
    }
    for reply in &replies {
        match reply {
            ServerMessage::GameOver { outcome, .. } => {
                info!("牌局 {} 结束: {:?}", session_id, outcome);
            }
            ServerMessage::Error { message } => {
                tracing::warn!("牌局 {} 的操作被拒绝: {}", session_id, message);
            }
            ServerMessage::SessionSnapshot(_) => {}
        }
    }
    replies
}

fn describe_hand(session: &Session) -> String {
    session
        .hand()
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use card24_core::Operator;

    #[test]
    fn test_invalid_operation_replies_with_error_only() {
        let mut session = Session::with_seed(1);
        let replies = handle_client_message(&mut session, Uuid::new_v4(), Operator::Add.into());
        assert!(matches!(&replies[..], [ServerMessage::Error { .. }]));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_restart_replies_with_fresh_snapshot() {
        let mut session = Session::with_seed(1);
        let first = session.hand()[0].id.clone();
        handle_client_message(&mut session, Uuid::new_v4(), ClientMessage::ToggleSelect { card_id: first });
        let replies = handle_client_message(&mut session, Uuid::new_v4(), ClientMessage::Restart);
        match &replies[..] {
            [ServerMessage::SessionSnapshot(snapshot)] => {
                assert_eq!(snapshot.hand.len(), 4);
                assert!(snapshot.selection.is_empty());
                assert!(snapshot.history.is_empty());
            }
            other => panic!("unexpected replies: {:?}", other),
        }
    }
}
