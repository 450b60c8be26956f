use crate::card::*;
use crate::error::GameError;
use crate::message::{ClientMessage, ServerMessage};
use crate::state::*;
use rand::{Rng, RngCore};
use uuid::Builder;

// --- 核心游戏流程函数 ---

impl<R: Rng> Session<R> {
    /// 选中或取消选中一张手牌
    ///
    /// - 已选中的牌再次点击会取消选中。
    /// - 未满两张时加入选中列表（按点击顺序，先选的是左操作数）。
    /// - 已选中两张时点击第三张牌不做任何事，也不算错误。
    ///
    /// 不在手牌中的 id 同样被忽略。返回选中状态是否发生了变化。
    pub fn toggle_select(&mut self, card_id: &str) -> bool {
        if let Some(pos) = self.selection.iter().position(|id| id == card_id) {
            self.selection.remove(pos);
            return true;
        }
        if self.selection.len() >= 2 || !self.hand.iter().any(|c| c.id == card_id) {
            return false;
        }
        self.selection.push(card_id.to_string());
        true
    }

    /// 对选中的两张牌执行运算
    ///
    /// 这是游戏逻辑的核心驱动函数。成功时一次性完成：
    /// - 从手牌中移除两张选中的牌，追加一张值为运算结果、没有花色的新牌；
    /// - 在运算记录中追加 `"<左> <运算符> <右> = <结果>"`；
    /// - 清空选中。
    ///
    /// 如果这次运算让手牌只剩一张，返回 `Some(Outcome)`，这是本局唯一一次终局通知。
    /// 选中的牌不是恰好两张时返回 `InvalidSelectionState`，状态不会被修改。
    pub fn apply_operator(&mut self, operator: Operator) -> Result<Option<Outcome>, GameError> {
        let invalid = GameError::InvalidSelectionState { selected: self.selection.len() };
        let (left_idx, right_idx) = match self.selection.as_slice() {
            [left, right] => match (self.position_in_hand(left), self.position_in_hand(right)) {
                (Some(l), Some(r)) => (l, r),
                _ => return Err(invalid),
            },
            _ => return Err(invalid),
        };

        let left = self.hand[left_idx].clone();
        let right = self.hand[right_idx].clone();
        let result = operator.apply(left.value, right.value);

        self.hand.retain(|c| c.id != left.id && c.id != right.id);
        let id = self.fresh_card_id();
        let new_card = Card::synthesized(id, result);
        self.history.push(format!("{} {} {} = {}", left.display, operator, right.display, new_card.display));
        self.hand.push(new_card);
        self.selection.clear();

        if self.hand.len() != 1 {
            return Ok(None);
        }
        let outcome = Outcome::from_final_value(self.hand[0].value);
        self.status = Some(outcome);
        Ok(Some(outcome))
    }

    /// 重新开局
    ///
    /// 从同一副牌重新抽取手牌，清空选中和运算记录。任何阶段都可以调用。
    pub fn restart(&mut self) {
        self.hand = draw_hand(&self.deck, HAND_SIZE, &mut self.rng);
        self.selection.clear();
        self.history.clear();
        self.status = None;
    }

    /// 处理宿主转发来的一条用户意图，返回需要通知展示层的消息
    ///
    /// 每次都会附带最新快照；终局时额外追加一条 `GameOver`。
    pub fn handle(&mut self, msg: ClientMessage) -> Vec<ServerMessage> {
        match msg {
            ClientMessage::ToggleSelect { card_id } => {
                self.toggle_select(&card_id);
            }
            ClientMessage::ApplyOperator(operator) => match self.apply_operator(operator) {
                Ok(Some(outcome)) => return vec![ServerMessage::SessionSnapshot(self.snapshot()), outcome.into()],
                Ok(None) => {}
                Err(e) => return vec![ServerMessage::Error { message: e.to_string() }],
            },
            ClientMessage::Restart => self.restart(),
            ClientMessage::GetSnapshot => {}
        }
        vec![ServerMessage::SessionSnapshot(self.snapshot())]
    }

    // --- 辅助逻辑函数 ---

    fn position_in_hand(&self, card_id: &str) -> Option<usize> {
        self.hand.iter().position(|c| c.id == card_id)
    }

    /// 生成与现有手牌都不冲突的新 id（随机字节构造的 UUID）
    fn fresh_card_id(&mut self) -> CardId {
        loop {
            let mut bytes = [0u8; 16];
            self.rng.fill_bytes(&mut bytes);
            let id = Builder::from_random_bytes(bytes).into_uuid().to_string();
            if self.position_in_hand(&id).is_none() {
                return id;
            }
        }
    }
}

// --- 单元测试 ---
