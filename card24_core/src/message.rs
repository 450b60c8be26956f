use crate::card::CardId;
use crate::state::{Operator, Outcome, SessionSnapshot};
use serde::{Deserialize, Serialize};

// --- 客户端 -> 服务器 的消息 ---
// 用户在界面上的每一个操作对应一条消息。

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// 选中或取消选中一张手牌
    ToggleSelect { card_id: CardId },
    /// 对选中的两张牌执行运算
    ApplyOperator(Operator),
    /// 用同一副牌重新发牌
    Restart,
    /// 请求当前状态的快照
    GetSnapshot,
}

// --- 服务器 -> 客户端 的消息 ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// 完整的局面快照，每次状态改变后发送
    SessionSnapshot(SessionSnapshot),

    /// 手牌刚变成一张时发送一次
    GameOver {
        outcome: Outcome,
        title: String,
        message: String,
    },

    Error { message: String },
}

impl From<Operator> for ClientMessage {
    fn from(operator: Operator) -> Self {
        ClientMessage::ApplyOperator(operator)
    }
}

impl From<Outcome> for ServerMessage {
    fn from(outcome: Outcome) -> Self {
        ServerMessage::GameOver {
            outcome,
            title: outcome.title().to_string(),
            message: outcome.message().to_string(),
        }
    }
}
