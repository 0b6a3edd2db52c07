//! 最短換算路徑搜尋（BFS）

use std::collections::{HashMap, VecDeque};

use rust_decimal::Decimal;
use uconv_core::{ConvError, ConversionPath, EngineConfig, Result};

use crate::graph::RuleGraph;

/// 換算路徑搜尋器
///
/// 以廣度優先搜尋找出步數最少的路徑；步數相同時取最先發現者
/// （依起點出邊順序，再依各單位鄰接表順序）。不保證數值上最精確。
#[derive(Debug, Clone, Copy)]
pub struct PathFinder {
    max_path_units: usize,
}

impl PathFinder {
    /// 創建搜尋器，`max_path_units` 為路徑最多可含的單位數（含兩端）
    pub fn new(max_path_units: usize) -> Self {
        Self { max_path_units }
    }

    /// 依引擎配置創建搜尋器
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_path_units)
    }

    /// 路徑單位數上限
    pub fn max_path_units(&self) -> usize {
        self.max_path_units
    }

    /// 搜尋 `from` 到 `to` 的最短換算路徑
    ///
    /// 找不到（或超出單位數上限）時回傳 `Ok(None)`，這是正常結果而非錯誤。
    /// 累積換算率只沿找到的路徑計算；該路徑溢位時才回傳錯誤。
    pub fn find_path<'a>(
        &self,
        graph: &'a RuleGraph,
        from: &'a str,
        to: &str,
    ) -> Result<Option<ConversionPath>> {
        if from == to {
            return Ok(Some(ConversionPath::trivial(from)));
        }

        // 單位 → (前一個單位, 該段換算率)
        let mut parents: HashMap<&'a str, (&'a str, Decimal)> = HashMap::new();
        let mut queue: VecDeque<(&'a str, usize)> = VecDeque::new();
        queue.push_back((from, 1));

        while let Some((unit, units)) = queue.pop_front() {
            // 已達上限的路徑不再延伸
            if units >= self.max_path_units {
                continue;
            }

            for edge in graph.neighbors(unit) {
                let next = edge.to.as_str();
                if next == from || parents.contains_key(next) {
                    continue;
                }
                parents.insert(next, (unit, edge.rate));

                if next == to {
                    let path = Self::trace_back(&parents, from, next)?;
                    tracing::debug!(
                        "找到換算路徑 {} → {}: {} 步，累積換算率 {}",
                        from,
                        to,
                        path.steps,
                        path.total_rate
                    );
                    return Ok(Some(path));
                }

                queue.push_back((next, units + 1));
            }
        }

        tracing::debug!(
            "找不到換算路徑 {} → {}（上限 {} 個單位）",
            from,
            to,
            self.max_path_units
        );
        Ok(None)
    }

    /// 由前驅表還原路徑，並依序累乘換算率
    fn trace_back<'a>(
        parents: &HashMap<&'a str, (&'a str, Decimal)>,
        from: &'a str,
        to: &'a str,
    ) -> Result<ConversionPath> {
        let mut hops = Vec::new();
        let mut current = to;
        while current != from {
            let Some(&(prev, rate)) = parents.get(current) else {
                break;
            };
            hops.push((prev, current, rate));
            current = prev;
        }
        hops.reverse();

        let mut units = vec![from.to_string()];
        let mut total_rate = Decimal::ONE;
        for (prev, next, rate) in hops {
            total_rate = total_rate.checked_mul(rate).ok_or_else(|| {
                ConvError::CalculationError(format!(
                    "累積換算率溢位: {} × {} ({} → {})",
                    total_rate, rate, prev, next
                ))
            })?;
            units.push(next.to_string());
        }

        Ok(ConversionPath::new(units, total_rate))
    }
}

impl Default for PathFinder {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
