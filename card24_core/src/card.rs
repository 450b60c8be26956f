use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

// --- 核心数据结构定义 ---

/// 牌的唯一标识。牌堆中的牌为 "点数+花色" (例如 "A♠")，合成牌为 UUID 字符串。
pub type CardId = String;

/// 花色 (Suit)
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Suit {
    Spade,   // 黑桃 ♠
    Heart,   // 红心 ♥
    Diamond, // 方块 ♦
    Club,    // 梅花 ♣
}

impl Suit {
    /// 建牌顺序：♠ ♥ ♦ ♣
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spade => "♠",
            Suit::Heart => "♥",
            Suit::Diamond => "♦",
            Suit::Club => "♣",
        }
    }
}

/// 点数 (Rank)
/// J、Q、K 在 24 点里都按 10 计算，A 按 1 计算
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven,
        Rank::Eight, Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King,
    ];

    /// 牌面上显示的文字
    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    /// 参与运算的数值
    pub fn value(self) -> f64 {
        match self {
            Rank::Ace => 1.0,
            Rank::Two => 2.0,
            Rank::Three => 3.0,
            Rank::Four => 4.0,
            Rank::Five => 5.0,
            Rank::Six => 6.0,
            Rank::Seven => 7.0,
            Rank::Eight => 8.0,
            Rank::Nine => 9.0,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10.0,
        }
    }
}

/// 单张牌 (Card)
///
/// 既可以是牌堆里的一张普通牌，也可以是两张牌运算后合成的新牌（没有花色）。
/// 两张牌是否相同只看 `id`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub display: String,
    #[serde(with = "value_repr")]
    pub value: f64,
    pub suit: Option<Suit>,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card {
            id: format!("{}{}", rank.label(), suit.symbol()),
            display: rank.label().to_string(),
            value: rank.value(),
            suit: Some(suit),
        }
    }

    /// 运算结果生成的新牌：显示值即结果本身，没有花色
    pub fn synthesized(id: CardId, value: f64) -> Card {
        Card {
            id,
            display: format_value(value),
            value,
            suit: None,
        }
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// --- 实现辅助功能 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.suit {
            Some(suit) => write!(f, "{} {}", self.display, suit),
            None => write!(f, "{}", self.display),
        }
    }
}

/// 把运算结果渲染成十进制文字
///
/// 有限值使用最短的可往返表示 ("8", "1.5", "0.3333333333333333")，负零写作 "0"。
/// 非有限值统一写作 "Infinity"、"-Infinity"、"NaN"。
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

fn parse_value_label(label: &str) -> Option<f64> {
    match label {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

/// JSON 没有 NaN / Infinity，非有限值按 `format_value` 的文字序列化
mod value_repr {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Label(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&super::format_value(*value))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Label(label) => super::parse_value_label(&label)
                .ok_or_else(|| D::Error::custom(format!("无效的牌值: {}", label))),
        }
    }
}

// --- 牌堆与发牌 ---

/// 创建一副完整的 52 张扑克牌，花色在外层、点数在内层
pub fn build_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);
    for &suit in &Suit::ALL {
        for &rank in &Rank::ALL {
            deck.push(Card::new(rank, suit));
        }
    }
    deck
}

/// 从牌堆中均匀随机地抽取 `count` 张不同的牌
///
/// 牌堆本身不会被修改，可以在重新开局时反复使用。
/// 采用部分抽样而不是整副洗牌；结果中牌的顺序没有意义。
pub fn draw_hand<R: Rng + ?Sized>(deck: &[Card], count: usize, rng: &mut R) -> Vec<Card> {
    deck.choose_multiple(rng, count).cloned().collect()
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_deck_has_52_unique_cards() {
        let deck = build_deck();
        assert_eq!(deck.len(), 52);
        let ids: HashSet<_> = deck.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), 52, "牌的 id 必须唯一");
    }

    #[test]
    fn test_deck_value_distribution() {
        let deck = build_deck();
        let mut counts: HashMap<u32, usize> = HashMap::new();
        for card in &deck {
            *counts.entry(card.value as u32).or_insert(0) += 1;
        }
        for v in 1..=9 {
            assert_eq!(counts[&v], 4, "点数 {} 应该出现 4 次", v);
        }
        assert_eq!(counts[&10], 16); // 10、J、Q、K
        assert_eq!(deck.iter().map(|c| c.value).sum::<f64>(), 340.0);
    }

    #[test]
    fn test_deck_order_is_suit_major() {
        let deck = build_deck();
        assert_eq!(deck[0].id, "A♠");
        assert_eq!(deck[12].id, "K♠");
        assert_eq!(deck[13].id, "A♥");
        assert_eq!(deck[26].id, "A♦");
        assert_eq!(deck[51].id, "K♣");
        assert_eq!(deck[9].display, "10");
        assert_eq!(deck[9].value, 10.0);
        assert_eq!(deck[10].value, 10.0); // J
        assert!(deck.iter().all(|c| c.suit.is_some()));
    }

    #[test]
    fn test_draw_hand_distinct_cards_from_deck() {
        let deck = build_deck();
        for seed in 0..200 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let hand = draw_hand(&deck, 4, &mut rng);
            assert_eq!(hand.len(), 4);
            let unique: HashSet<_> = hand.iter().collect();
            assert_eq!(unique.len(), 4, "seed {} 抽到了重复的牌", seed);
            assert!(hand.iter().all(|c| deck.contains(c)));
        }
        assert_eq!(deck.len(), 52, "抽牌不应修改牌堆");
    }

    #[test]
    fn test_draw_hand_is_uniform() {
        // 13000 次抽 4 张，每张牌期望被抽中 1000 次，标准差约 30
        let deck = build_deck();
        let mut rng = ChaCha20Rng::seed_from_u64(2024);
        let mut counts: HashMap<CardId, usize> = HashMap::new();
        for _ in 0..13_000 {
            for card in draw_hand(&deck, 4, &mut rng) {
                *counts.entry(card.id).or_insert(0) += 1;
            }
        }
        assert_eq!(counts.len(), 52);
        for (id, count) in &counts {
            assert!((800..=1200).contains(count), "{} 被抽中 {} 次，分布不均匀", id, count);
        }
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(8.0), "8");
        assert_eq!(format_value(1.5), "1.5");
        assert_eq!(format_value(-3.0), "-3");
        assert_eq!(format_value(1.0 / 3.0), "0.3333333333333333");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(f64::INFINITY), "Infinity");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_value(f64::NAN), "NaN");
    }

    #[test]
    fn test_card_display() {
        assert_eq!(Card::new(Rank::Queen, Suit::Heart).to_string(), "Q ♥");
        assert_eq!(Card::synthesized("x".into(), 16.0).to_string(), "16");
    }

    #[test]
    fn test_card_identity_is_by_id() {
        let a = Card::synthesized("same".into(), 1.0);
        let b = Card::synthesized("same".into(), f64::NAN);
        assert_eq!(a, b);
        assert_ne!(Card::new(Rank::Ace, Suit::Spade), Card::new(Rank::Ace, Suit::Heart));
    }
}
