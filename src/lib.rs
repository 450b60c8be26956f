//! 24 点游戏。规则与状态全部在 [`card24_core`] 中，
//! 网络宿主见 `card24_server`，终端客户端见 `card24_client`。

pub use card24_core::*;
