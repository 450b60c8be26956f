//! # 24 点核心逻辑库
//!
//! 这个 `core` crate 包含了 24 点游戏的全部规则：建牌、随机抽牌、
//! 选牌、两张牌的四则运算合并以及胜负判定，另外定义了宿主与核心之间的消息。
//! 它与具体的展示层（终端客户端、网络服务器）解耦，
//! 任何上层应用都可以持有一个 [`Session`] 并把用户意图转交给它。

mod card;
mod error;
mod logic;
mod message;
mod state;

pub use card::*;

pub use error::*;

pub use message::*;

pub use state::*;
