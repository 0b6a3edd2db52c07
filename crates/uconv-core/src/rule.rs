//! 換算規則模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::UnitCategory;

/// 換算規則（全域換算圖的一條有向邊）
///
/// 語意：1 `from_unit` = `rate` `to_unit`。反向換算使用 `1 / rate`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRule {
    /// 規則ID
    pub id: Uuid,

    /// 來源單位代碼
    pub from_unit: String,

    /// 目標單位代碼
    pub to_unit: String,

    /// 換算率（嚴格為正）
    pub rate: Decimal,

    /// 單位類別（須與兩端單位一致）
    pub category: UnitCategory,
}

impl ConversionRule {
    /// 創建新的換算規則
    pub fn new(
        from_unit: impl Into<String>,
        to_unit: impl Into<String>,
        rate: Decimal,
        category: UnitCategory,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            rate,
            category,
        }
    }

    /// 建構器模式：指定規則ID（編輯既有規則時使用）
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// 檢查是否連接相同的有向單位對
    pub fn connects(&self, from: &str, to: &str) -> bool {
        self.from_unit == from && self.to_unit == to
    }

    /// 規則本身的結構檢查：兩端不同、換算率為正
    pub fn check_shape(&self) -> crate::Result<()> {
        if self.from_unit == self.to_unit {
            return Err(crate::ConvError::InvalidRule(format!(
                "來源與目標單位相同: {}",
                self.from_unit
            )));
        }
        if self.rate <= Decimal::ZERO {
            return Err(crate::ConvError::InvalidRule(format!(
                "換算率必須大於零: {}",
                self.rate
            )));
        }
        Ok(())
    }
}
