use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// 运算需要恰好选中两张牌
    #[error("需要先选中两张牌才能运算（当前选中 {selected} 张）")]
    InvalidSelectionState { selected: usize },
}
