//! 換算規則循環檢測（DFS）
//!
//! 寫入規則前的閘門：新增或編輯後的規則集合（只看規則本身方向，
//! 不加反向邊）必須保持無環。

use std::collections::HashSet;

use serde::Serialize;
use uconv_core::{ConvError, ConversionRule, Result};
use uuid::Uuid;

use crate::graph::RuleGraph;

/// 循環檢測結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "cycle")]
pub enum CycleCheck {
    /// 無循環
    Clean,
    /// 有循環：依序列出的單位，首尾相同
    Cycle(Vec<String>),
}

impl CycleCheck {
    /// 是否無循環
    pub fn is_clean(&self) -> bool {
        matches!(self, CycleCheck::Clean)
    }

    /// 循環路徑（若有）
    pub fn cycle(&self) -> Option<&[String]> {
        match self {
            CycleCheck::Clean => None,
            CycleCheck::Cycle(units) => Some(units),
        }
    }

    /// 轉為寫入閘門結果：有循環時回傳 `CycleRejected`
    pub fn into_result(self) -> Result<()> {
        match self {
            CycleCheck::Clean => Ok(()),
            CycleCheck::Cycle(cycle) => Err(ConvError::CycleRejected { cycle }),
        }
    }
}

/// 循環檢測器
pub struct CycleDetector;

impl CycleDetector {
    /// 檢查加入候選規則 `from → to` 後是否形成循環
    ///
    /// `exclude` 為正在編輯的規則ID，其舊版本不參與檢查。
    pub fn would_create_cycle(
        rules: &[ConversionRule],
        from: &str,
        to: &str,
        exclude: Option<Uuid>,
    ) -> CycleCheck {
        let mut graph = RuleGraph::directed(rules, exclude);
        graph.add_edge(from, to, rust_decimal::Decimal::ONE);

        let result = Self::find_cycle_from(&graph, from);

        match &result {
            CycleCheck::Clean => {
                tracing::debug!("候選規則 {} → {} 未形成循環", from, to)
            }
            CycleCheck::Cycle(cycle) => {
                tracing::debug!("候選規則 {} → {} 形成循環: {:?}", from, to, cycle)
            }
        }

        result
    }

    /// 從指定單位開始深度優先搜尋循環
    ///
    /// 顯式堆疊的每層記錄單位與下一條待走的出邊索引，
    /// 堆疊本身即為目前路徑（`on_path` 為其集合形式）；
    /// `finished` 記錄已完整探索且無環的單位。
    pub fn find_cycle_from(graph: &RuleGraph, start: &str) -> CycleCheck {
        let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
        let mut on_path: HashSet<&str> = HashSet::from([start]);
        let mut finished: HashSet<&str> = HashSet::new();

        while let Some(top) = stack.last_mut() {
            let (unit, index) = *top;
            top.1 += 1;

            let Some(edge) = graph.neighbors(unit).get(index) else {
                stack.pop();
                on_path.remove(unit);
                finished.insert(unit);
                continue;
            };
            let next = edge.to.as_str();

            if on_path.contains(next) {
                let position = stack.iter().position(|(u, _)| *u == next).unwrap_or(0);
                let mut cycle: Vec<String> =
                    stack[position..].iter().map(|(u, _)| u.to_string()).collect();
                cycle.push(next.to_string());
                return CycleCheck::Cycle(cycle);
            }

            if !finished.contains(next) {
                on_path.insert(next);
                stack.push((next, 0));
            }
        }

        CycleCheck::Clean
    }
}
