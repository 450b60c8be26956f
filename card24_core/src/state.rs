use crate::card::{build_deck, draw_hand, Card, CardId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 每局发到手上的牌数
pub const HAND_SIZE: usize = 4;

/// 最后一张牌等于这个值即为胜利
pub const TARGET: f64 = 24.0;

/// 四则运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Subtract, Operator::Multiply, Operator::Divide];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// 左操作数为先选中的牌。除法按实数计算，除以 0 得到 Infinity 或 NaN
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// 终局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub fn from_final_value(value: f64) -> Outcome {
        if value == TARGET { Outcome::Won } else { Outcome::Lost }
    }

    pub fn title(self) -> &'static str {
        match self {
            Outcome::Won => "You Win!",
            Outcome::Lost => "Try Again",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Outcome::Won => "You made 24!",
            Outcome::Lost => "The result is not 24.",
        }
    }
}

/// 一局游戏的全部状态
///
/// 牌堆在创建后不再改变；手牌、选中的牌和运算记录只会被 `logic` 中的操作修改。
/// `R` 是随机源，抽牌和生成新牌 id 都从它取随机数，固定种子即可复现整局。
#[derive(Debug, Clone)]
pub struct Session<R: Rng = ChaCha20Rng> {
    pub(crate) deck: Vec<Card>,
    pub(crate) hand: Vec<Card>,
    // 按选中的先后顺序排列，最多两张
    pub(crate) selection: Vec<CardId>,
    pub(crate) history: Vec<String>,
    // 只在手牌刚变成一张时写入，重新开局时清空
    pub(crate) status: Option<Outcome>,
    pub(crate) rng: R,
}

/// 发给宿主渲染用的只读快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub hand: Vec<Card>,
    pub selection: Vec<CardId>,
    pub history: Vec<String>,
    pub status: Option<Outcome>,
    /// 当前可用的运算符，只有选中两张牌时才非空
    pub operators: Vec<Operator>,
}

// --- Session 的实现方法 ---

impl Session {
    /// 使用系统熵作为随机源开始一局新游戏
    pub fn new() -> Self {
        Self::with_rng(ChaCha20Rng::from_rng(&mut rand::rng()))
    }

    /// 固定种子，抽牌和生成的 id 都可复现
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha20Rng::seed_from_u64(seed))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(mut rng: R) -> Self {
        let deck = build_deck();
        let hand = draw_hand(&deck, HAND_SIZE, &mut rng);
        Session {
            deck,
            hand,
            selection: Vec::with_capacity(2),
            history: Vec::new(),
            status: None,
            rng,
        }
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn selection(&self) -> &[CardId] {
        &self.selection
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// `None` 表示还在进行中
    pub fn status(&self) -> Option<Outcome> {
        self.status
    }

    pub fn is_selected(&self, card_id: &str) -> bool {
        self.selection.iter().any(|id| id == card_id)
    }

    /// 是否已选中两张牌，可以进行运算
    pub fn can_combine(&self) -> bool {
        self.selection.len() == 2
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            hand: self.hand.clone(),
            selection: self.selection.clone(),
            history: self.history.clone(),
            status: self.status,
            operators: if self.can_combine() { Operator::ALL.to_vec() } else { Vec::new() },
        }
    }
}
