//! 計量單位模型

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// 單位類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitCategory {
    /// 容量（ml、L、bottle）
    Volume,
    /// 重量（g、kg）
    Weight,
    /// 數量（個、包、箱）
    Quantity,
}

/// 計量單位（對換算引擎而言是唯讀參考資料）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// 單位代碼（全系統唯一，如 "ml"、"bottle"）
    pub code: String,

    /// 顯示名稱
    pub name: String,

    /// 單位類別
    pub category: UnitCategory,

    /// 顯示用小數位數
    #[serde(default = "default_display_scale")]
    pub display_scale: u32,
}

fn default_display_scale() -> u32 {
    2
}

impl Unit {
    /// 創建新的單位（預設顯示 2 位小數）
    pub fn new(code: impl Into<String>, name: impl Into<String>, category: UnitCategory) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            category,
            display_scale: default_display_scale(),
        }
    }

    /// 建構器模式：設置顯示小數位數
    pub fn with_display_scale(mut self, scale: u32) -> Self {
        self.display_scale = scale;
        self
    }

    /// 依單位的顯示精度格式化數量（四捨五入）
    pub fn format_quantity(&self, quantity: Decimal) -> String {
        let rounded =
            quantity.round_dp_with_strategy(self.display_scale, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.*} {}", self.display_scale as usize, rounded, self.code)
    }

    /// 檢查兩個單位是否同一類別
    pub fn same_category(&self, other: &Unit) -> bool {
        self.category == other.category
    }
}
