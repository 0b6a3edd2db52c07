//! 外部介面的請求/回應結構
//!
//! 數量與換算率以字串形式序列化，避免二進位浮點誤差。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uconv_core::{ConvError, ConversionPath, ConversionResult, ConversionSource};
use uuid::Uuid;

use crate::cycle::CycleCheck;

/// 換算請求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub from_unit: String,
    pub to_unit: String,
    /// 十進位數字字串
    pub quantity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_id: Option<String>,
}

impl ConvertRequest {
    pub fn new(from_unit: &str, to_unit: &str, quantity: &str) -> Self {
        Self {
            from_unit: from_unit.to_string(),
            to_unit: to_unit.to_string(),
            quantity: quantity.to_string(),
            material_id: None,
        }
    }

    /// 建構器模式：設置物料
    pub fn with_material(mut self, material_id: &str) -> Self {
        self.material_id = Some(material_id.to_string());
        self
    }
}

/// 換算回應
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub converted_quantity: Decimal,
    pub source: ConversionSource,
    pub provenance: String,
}

impl From<ConversionResult> for ConvertResponse {
    fn from(result: ConversionResult) -> Self {
        Self {
            converted_quantity: result.converted_quantity,
            source: result.source,
            provenance: result.provenance,
        }
    }
}

/// 路徑查詢請求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRequest {
    pub from_unit: String,
    pub to_unit: String,
}

/// 路徑查詢回應
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResponse {
    pub found: bool,
    pub path: Vec<String>,
    pub total_rate: Option<Decimal>,
    pub steps: usize,
}

impl From<Option<ConversionPath>> for PathResponse {
    fn from(path: Option<ConversionPath>) -> Self {
        match path {
            Some(path) => Self {
                found: true,
                total_rate: Some(path.total_rate),
                steps: path.steps,
                path: path.units,
            },
            None => Self {
                found: false,
                path: Vec::new(),
                total_rate: None,
                steps: 0,
            },
        }
    }
}

/// 循環檢測請求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRequest {
    pub from_unit: String,
    pub to_unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_rule_id: Option<Uuid>,
}

/// 循環檢測回應
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleValidationResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_path: Option<Vec<String>>,
}

impl From<CycleCheck> for CycleValidationResponse {
    fn from(check: CycleCheck) -> Self {
        match check {
            CycleCheck::Clean => Self {
                valid: true,
                cycle_path: None,
            },
            CycleCheck::Cycle(cycle) => Self {
                valid: false,
                cycle_path: Some(cycle),
            },
        }
    }
}

/// 錯誤回應
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl From<&ConvError> for ErrorBody {
    fn from(err: &ConvError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}
