//! 換算優先順序決策：物料專屬換算率 vs. 全域規則圖

use rust_decimal::Decimal;
use uconv_core::{Material, OverrideDirection};

/// 換算決策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionPlan {
    /// 使用物料專屬換算率
    MaterialOverride {
        rate: Decimal,
        direction: OverrideDirection,
    },
    /// 交由全域規則圖
    GlobalDelegate,
    /// 物料既無可用換算率，也未啟用全域換算
    Unconfigured,
    /// 物料有專屬換算率，但請求的單位對不是其採購/庫存單位對
    UnsupportedPair,
}

impl ConversionPlan {
    /// 依物料設定決定換算方式
    ///
    /// | 換算率 > 0 | 採購/庫存單位對 | 優先全域 | 決策 |
    /// |---|---|---|---|
    /// | 是 | 是 | 任意 | MaterialOverride |
    /// | 是 | 否 | 是 | GlobalDelegate |
    /// | 是 | 否 | 否 | UnsupportedPair |
    /// | 否 | - | 是 | GlobalDelegate |
    /// | 否 | - | 否 | Unconfigured |
    pub fn decide(material: &Material, from: &str, to: &str) -> Self {
        match (
            material.usable_override_rate(),
            material.override_direction(from, to),
            material.prefer_global_conversion,
        ) {
            (Some(rate), Some(direction), _) => ConversionPlan::MaterialOverride { rate, direction },
            (Some(_), None, true) => ConversionPlan::GlobalDelegate,
            (Some(_), None, false) => ConversionPlan::UnsupportedPair,
            (None, _, true) => ConversionPlan::GlobalDelegate,
            (None, _, false) => ConversionPlan::Unconfigured,
        }
    }
}
