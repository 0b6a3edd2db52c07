//! 換算規則圖快照
//!
//! 每次運算都由當下讀取的規則列表建立一份不可變的鄰接表，
//! 建立成本 O(規則數)，之後的 BFS/DFS 成本為 O(規則數 + 單位數)。

use std::collections::HashMap;

use rust_decimal::Decimal;
use uconv_core::{ConvError, ConversionRule, Result};
use uuid::Uuid;

/// 圖中的一條邊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// 目標單位
    pub to: String,
    /// 1 起點單位 = rate 目標單位
    pub rate: Decimal,
}

/// 換算規則圖（鄰接表）
///
/// 鄰接表中的邊依規則列表順序排列，搜尋結果因此可重現。
#[derive(Debug, Clone, Default)]
pub struct RuleGraph {
    adjacency: HashMap<String, Vec<Edge>>,
    edge_count: usize,
}

impl RuleGraph {
    /// 雙向圖：每條規則 a→b 同時產生反向邊 b→a（換算率 1/rate）
    ///
    /// 用於最短換算路徑搜尋。換算率非正的規則無法求反，直接拒絕。
    pub fn bidirectional(rules: &[ConversionRule]) -> Result<Self> {
        let mut graph = Self::default();

        for rule in rules {
            if rule.rate <= Decimal::ZERO {
                return Err(ConvError::InvalidRule(format!(
                    "規則 {} 的換算率必須大於零: {}",
                    rule.id, rule.rate
                )));
            }

            let inverse = Decimal::ONE.checked_div(rule.rate).ok_or_else(|| {
                ConvError::CalculationError(format!("無法計算 1/{} 的反向換算率", rule.rate))
            })?;

            graph.add_edge(&rule.from_unit, &rule.to_unit, rule.rate);
            graph.add_edge(&rule.to_unit, &rule.from_unit, inverse);
        }

        Ok(graph)
    }

    /// 單向圖：僅包含規則本身的方向，可排除指定規則
    ///
    /// 用於循環檢測；`exclude` 讓編輯中的規則不與自己的舊版本衝突。
    pub fn directed(rules: &[ConversionRule], exclude: Option<Uuid>) -> Self {
        let mut graph = Self::default();

        for rule in rules {
            if Some(rule.id) == exclude {
                continue;
            }
            graph.add_edge(&rule.from_unit, &rule.to_unit, rule.rate);
        }

        graph
    }

    /// 加入一條有向邊
    pub fn add_edge(&mut self, from: &str, to: &str, rate: Decimal) {
        self.adjacency
            .entry(from.to_string())
            .or_default()
            .push(Edge {
                to: to.to_string(),
                rate,
            });
        self.edge_count += 1;
    }

    /// 取得某單位的出邊（依加入順序）
    pub fn neighbors(&self, unit: &str) -> &[Edge] {
        self.adjacency
            .get(unit)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 邊數
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}
