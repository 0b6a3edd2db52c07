//! # Unit Conversion Core
//!
//! 單位換算核心資料模型與類型定義

pub mod config;
pub mod conversion;
pub mod material;
pub mod registry;
pub mod rule;
pub mod unit;

// Re-export 主要類型
pub use config::EngineConfig;
pub use conversion::{ConversionPath, ConversionResult, ConversionSource};
pub use material::{Material, OverrideDirection};
pub use registry::{InMemoryRegistry, Registry, RuleStore};
pub use rule::ConversionRule;
pub use unit::{Unit, UnitCategory};

/// 換算錯誤類型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvError {
    #[error("未知的單位: {0}")]
    UnknownUnit(String),

    #[error("找不到物料: {0}")]
    MaterialNotFound(String),

    #[error("物料 {material_id} 未設定換算率，且未啟用全域換算")]
    ConversionNotConfigured { material_id: String },

    #[error("物料 {material_id} 的換算率不支援 {from} → {to}")]
    UnsupportedConversion {
        material_id: String,
        from: String,
        to: String,
    },

    #[error("找不到換算路徑: {from} → {to}")]
    PathNotFound { from: String, to: String },

    #[error("無效的數量: {0}")]
    InvalidQuantity(String),

    #[error("換算規則會形成循環: {}", .cycle.join(" → "))]
    CycleRejected { cycle: Vec<String> },

    #[error("無效的換算規則: {0}")]
    InvalidRule(String),

    #[error("換算規則已存在: {from} → {to}")]
    DuplicateRule { from: String, to: String },

    #[error("找不到換算規則: {0}")]
    RuleNotFound(uuid::Uuid),

    #[error("讀取資料來源失敗: {0}")]
    StoreError(String),

    #[error("計算錯誤: {0}")]
    CalculationError(String),

    #[error("配置錯誤: {0}")]
    ConfigError(String),
}

impl ConvError {
    /// 穩定的錯誤代碼（供邊界層輸出）
    pub fn code(&self) -> &'static str {
        match self {
            ConvError::UnknownUnit(_) => "UNKNOWN_UNIT",
            ConvError::MaterialNotFound(_) => "MATERIAL_NOT_FOUND",
            ConvError::ConversionNotConfigured { .. } => "CONVERSION_NOT_CONFIGURED",
            ConvError::UnsupportedConversion { .. } => "UNSUPPORTED_CONVERSION",
            ConvError::PathNotFound { .. } => "PATH_NOT_FOUND",
            ConvError::InvalidQuantity(_) => "INVALID_QUANTITY",
            ConvError::CycleRejected { .. } => "CYCLE_REJECTED",
            ConvError::InvalidRule(_) => "INVALID_RULE",
            ConvError::DuplicateRule { .. } => "DUPLICATE_RULE",
            ConvError::RuleNotFound(_) => "RULE_NOT_FOUND",
            ConvError::StoreError(_) => "STORE_ERROR",
            ConvError::CalculationError(_) => "CALCULATION_ERROR",
            ConvError::ConfigError(_) => "CONFIG_ERROR",
        }
    }

    /// 是否為「找不到路徑」（正常結果，而非故障）
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConvError::PathNotFound { .. })
    }

    /// 是否為資料來源故障（呼叫端可自行重試）
    pub fn is_store_failure(&self) -> bool {
        matches!(self, ConvError::StoreError(_))
    }
}

pub type Result<T> = std::result::Result<T, ConvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ConvError::UnknownUnit("kg".into()).code(), "UNKNOWN_UNIT");
        assert_eq!(
            ConvError::PathNotFound {
                from: "kg".into(),
                to: "ml".into()
            }
            .code(),
            "PATH_NOT_FOUND"
        );
    }

    #[test]
    fn test_cycle_message_lists_units() {
        let err = ConvError::CycleRejected {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "換算規則會形成循環: a → b → a");
    }

    #[test]
    fn test_not_found_is_not_store_failure() {
        let err = ConvError::PathNotFound {
            from: "a".into(),
            to: "b".into(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_store_failure());
        assert!(ConvError::StoreError("timeout".into()).is_store_failure());
    }
}
