//! 換算引擎配置

use serde::{Deserialize, Serialize};

use crate::{ConvError, Result};

/// 換算引擎配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// 換算路徑最多可含的單位數（含兩端）
    ///
    /// 預設 6：超過 6 個單位（即 7 個以上）的路徑視為不可達，
    /// 用以限制病態規則圖上的搜尋成本。
    pub max_path_units: usize,

    /// 換算結果保留的小數位數（四捨五入）
    pub result_scale: u32,

    /// 邊界輸入數量的整數位數上限
    pub max_integer_digits: u32,

    /// 邊界輸入數量的小數位數上限
    pub max_fraction_digits: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_path_units: 6,
            result_scale: 6,
            max_integer_digits: 10,
            max_fraction_digits: 6,
        }
    }
}

impl EngineConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 文件載入配置（未提供的欄位使用預設值）
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConvError::ConfigError(format!("無法解析配置: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置路徑單位數上限
    pub fn with_max_path_units(mut self, units: usize) -> Self {
        self.max_path_units = units;
        self
    }

    /// 建構器模式：設置結果小數位數
    pub fn with_result_scale(mut self, scale: u32) -> Self {
        self.result_scale = scale;
        self
    }

    /// 建構器模式：設置輸入數量位數限制
    pub fn with_quantity_digits(mut self, integer_digits: u32, fraction_digits: u32) -> Self {
        self.max_integer_digits = integer_digits;
        self.max_fraction_digits = fraction_digits;
        self
    }

    /// 檢查配置是否合理
    pub fn validate(&self) -> Result<()> {
        if self.max_path_units < 2 {
            return Err(ConvError::ConfigError(format!(
                "路徑單位數上限至少為 2，目前為 {}",
                self.max_path_units
            )));
        }

        // rust_decimal 最多 28 位小數
        if self.result_scale > 28 {
            return Err(ConvError::ConfigError(format!(
                "結果小數位數不可超過 28，目前為 {}",
                self.result_scale
            )));
        }

        if self.max_integer_digits == 0 || self.max_integer_digits > 28 {
            return Err(ConvError::ConfigError(format!(
                "整數位數上限必須介於 1 到 28，目前為 {}",
                self.max_integer_digits
            )));
        }

        if self.max_fraction_digits > 28 {
            return Err(ConvError::ConfigError(format!(
                "小數位數上限不可超過 28，目前為 {}",
                self.max_fraction_digits
            )));
        }

        Ok(())
    }
}
