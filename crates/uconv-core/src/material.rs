//! 物料換算設定模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 物料專屬換算的方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideDirection {
    /// 採購單位 → 庫存單位（乘以換算率）
    PurchaseToInventory,
    /// 庫存單位 → 採購單位（除以換算率）
    InventoryToPurchase,
}

/// 物料（僅包含換算相關欄位）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// 物料ID
    pub id: String,

    /// 庫存單位代碼
    pub inventory_unit: String,

    /// 採購單位代碼
    pub purchase_unit: String,

    /// 物料專屬換算率：1 採購單位 = rate 庫存單位
    pub override_rate: Option<Decimal>,

    /// 是否優先使用全域換算規則
    #[serde(default)]
    pub prefer_global_conversion: bool,
}

impl Material {
    /// 創建新的物料（預設無專屬換算率、不使用全域換算）
    pub fn new(
        id: impl Into<String>,
        inventory_unit: impl Into<String>,
        purchase_unit: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            inventory_unit: inventory_unit.into(),
            purchase_unit: purchase_unit.into(),
            override_rate: None,
            prefer_global_conversion: false,
        }
    }

    /// 建構器模式：設置專屬換算率
    pub fn with_override_rate(mut self, rate: Decimal) -> Self {
        self.override_rate = Some(rate);
        self
    }

    /// 建構器模式：設置是否優先使用全域換算
    pub fn with_prefer_global(mut self, prefer: bool) -> Self {
        self.prefer_global_conversion = prefer;
        self
    }

    /// 可用的專屬換算率（必須嚴格為正）
    pub fn usable_override_rate(&self) -> Option<Decimal> {
        self.override_rate.filter(|rate| *rate > Decimal::ZERO)
    }

    /// 單位對若為本物料的採購/庫存單位對，回傳換算方向
    pub fn override_direction(&self, from: &str, to: &str) -> Option<OverrideDirection> {
        if from == self.purchase_unit && to == self.inventory_unit {
            Some(OverrideDirection::PurchaseToInventory)
        } else if from == self.inventory_unit && to == self.purchase_unit {
            Some(OverrideDirection::InventoryToPurchase)
        } else {
            None
        }
    }
}
