//! 換算結果與換算路徑

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 換算依據來源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversionSource {
    /// 物料專屬換算率
    Material,
    /// 全域換算規則
    Global,
}

/// 換算路徑（來源到目標的單位序列與累積換算率）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionPath {
    /// 單位序列（含兩端）
    pub units: Vec<String>,

    /// 累積換算率：1 來源單位 = total_rate 目標單位
    pub total_rate: Decimal,

    /// 步數（邊數）
    pub steps: usize,
}

impl ConversionPath {
    /// 單一節點的平凡路徑（來源即目標）
    pub fn trivial(unit: impl Into<String>) -> Self {
        Self {
            units: vec![unit.into()],
            total_rate: Decimal::ONE,
            steps: 0,
        }
    }

    /// 由單位序列與累積換算率建立路徑
    pub fn new(units: Vec<String>, total_rate: Decimal) -> Self {
        let steps = units.len().saturating_sub(1);
        Self {
            units,
            total_rate,
            steps,
        }
    }

    /// 來源單位
    pub fn source(&self) -> Option<&str> {
        self.units.first().map(String::as_str)
    }

    /// 目標單位
    pub fn target(&self) -> Option<&str> {
        self.units.last().map(String::as_str)
    }

    /// 以箭頭串接的路徑描述
    pub fn describe(&self) -> String {
        self.units.join(" -> ")
    }
}

/// 換算結果（不落地，每次呼叫產生）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// 換算後數量
    pub converted_quantity: Decimal,

    /// 換算依據來源
    pub source: ConversionSource,

    /// 換算依據說明
    pub provenance: String,

    /// 全域換算使用的路徑
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<ConversionPath>,
}

impl ConversionResult {
    /// 同單位換算（數量不變）
    pub fn identity(quantity: Decimal) -> Self {
        Self {
            converted_quantity: quantity,
            source: ConversionSource::Global,
            provenance: "identity".to_string(),
            path: None,
        }
    }

    /// 物料專屬換算率的結果
    pub fn from_material(converted_quantity: Decimal, provenance: String) -> Self {
        Self {
            converted_quantity,
            source: ConversionSource::Material,
            provenance,
            path: None,
        }
    }

    /// 全域規則圖的結果
    pub fn from_global(converted_quantity: Decimal, path: ConversionPath) -> Self {
        let provenance = format!(
            "global: {} (rate {}, {} steps)",
            path.describe(),
            path.total_rate.normalize(),
            path.steps
        );
        Self {
            converted_quantity,
            source: ConversionSource::Global,
            provenance,
            path: Some(path),
        }
    }

    /// 換算步數（同單位與物料換算視為 0 步）
    pub fn steps(&self) -> usize {
        self.path.as_ref().map(|p| p.steps).unwrap_or(0)
    }
}
