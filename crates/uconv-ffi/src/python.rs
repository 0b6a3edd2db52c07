//! Python 綁定實現
//!
//! 所有請求/回應皆以 JSON 字串傳遞，欄位名稱與 `uconv_calc::dto` 相同。

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uconv_calc::{
    ConversionService, ConvertRequest, CycleRequest, ErrorBody, InMemoryRuleStore, PathRequest,
};
use uconv_core::{
    ConvError, ConversionRule, EngineConfig, InMemoryRegistry, Material, Unit, UnitCategory,
};
use uuid::Uuid;

/// 規則輸入（新增時可省略 id）
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleInput {
    id: Option<Uuid>,
    from_unit: String,
    to_unit: String,
    rate: Decimal,
    category: UnitCategory,
}

impl RuleInput {
    fn into_rule(self) -> ConversionRule {
        let rule = ConversionRule::new(self.from_unit, self.to_unit, self.rate, self.category);
        match self.id {
            Some(id) => rule.with_id(id),
            None => rule,
        }
    }
}

/// Python 換算引擎
#[pyclass(name = "ConversionEngine")]
pub struct PyConversionEngine {
    service: ConversionService<InMemoryRegistry, InMemoryRuleStore>,
}

#[pymethods]
impl PyConversionEngine {
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => EngineConfig::from_json_str(json).map_err(to_py_err)?,
            None => EngineConfig::default(),
        };

        let service = ConversionService::new(InMemoryRegistry::new(), InMemoryRuleStore::new(), config)
            .map_err(to_py_err)?;

        Ok(Self { service })
    }

    /// 登錄單位
    fn register_unit(&mut self, unit_json: &str) -> PyResult<()> {
        let unit: Unit = parse_json(unit_json)?;
        self.service.registry_mut().insert_unit(unit);
        Ok(())
    }

    /// 登錄物料
    fn register_material(&mut self, material_json: &str) -> PyResult<()> {
        let material: Material = parse_json(material_json)?;
        self.service.registry_mut().insert_material(material);
        Ok(())
    }

    /// 新增換算規則，回傳含 id 的規則 JSON
    fn create_rule(&self, rule_json: &str) -> PyResult<String> {
        let input: RuleInput = parse_json(rule_json)?;
        let rule = self
            .service
            .create_rule(input.into_rule())
            .map_err(to_py_err)?;
        to_json(&rule)
    }

    /// 編輯換算規則（JSON 必須帶 id）
    fn update_rule(&self, rule_json: &str) -> PyResult<String> {
        let input: RuleInput = parse_json(rule_json)?;
        if input.id.is_none() {
            return Err(PyValueError::new_err("編輯規則必須提供 id"));
        }
        let rule = self
            .service
            .update_rule(input.into_rule())
            .map_err(to_py_err)?;
        to_json(&rule)
    }

    /// 刪除換算規則
    fn delete_rule(&self, rule_id: &str) -> PyResult<()> {
        let id = Uuid::parse_str(rule_id)
            .map_err(|e| PyValueError::new_err(format!("無效的規則ID: {}", e)))?;
        self.service.delete_rule(id).map_err(to_py_err)?;
        Ok(())
    }

    /// 換算：{ fromUnit, toUnit, quantity, materialId? } → { convertedQuantity, source, provenance }
    fn convert(&self, request_json: &str) -> PyResult<String> {
        let request: ConvertRequest = parse_json(request_json)?;
        let response = self.service.convert(&request).map_err(to_py_err)?;
        to_json(&response)
    }

    /// 檢查是否可換算
    #[pyo3(signature = (from_unit, to_unit, material_id=None))]
    fn can_convert(
        &self,
        from_unit: &str,
        to_unit: &str,
        material_id: Option<&str>,
    ) -> PyResult<bool> {
        self.service
            .can_convert(from_unit, to_unit, material_id)
            .map_err(to_py_err)
    }

    /// 路徑查詢：{ fromUnit, toUnit } → { found, path, totalRate, steps }
    fn calculate_path(&self, request_json: &str) -> PyResult<String> {
        let request: PathRequest = parse_json(request_json)?;
        let response = self.service.calculate_path(&request).map_err(to_py_err)?;
        to_json(&response)
    }

    /// 循環檢測：{ fromUnit, toUnit, excludeRuleId? } → { valid, cyclePath? }
    fn validate_cycle(&self, request_json: &str) -> PyResult<String> {
        let request: CycleRequest = parse_json(request_json)?;
        let response = self.service.validate_cycle(&request).map_err(to_py_err)?;
        to_json(&response)
    }

    /// 計算總需求量，回傳十進位字串
    fn required_quantity(
        &self,
        material_id: &str,
        per_unit_quantity: &str,
        bom_unit: &str,
        target_unit: &str,
        produced_quantity: &str,
    ) -> PyResult<String> {
        let per_unit = parse_decimal(per_unit_quantity)?;
        let produced = parse_decimal(produced_quantity)?;
        let total = self
            .service
            .required_quantity(material_id, per_unit, bom_unit, target_unit, produced)
            .map_err(to_py_err)?;
        Ok(total.to_string())
    }
}

/// 安裝 tracing 日誌輸出（重複呼叫時回傳 False）
#[pyfunction]
#[pyo3(signature = (level="info"))]
pub fn init_logging(level: &str) -> PyResult<bool> {
    let level: tracing::Level = level
        .parse()
        .map_err(|_| PyValueError::new_err(format!("無效的日誌等級: {}", level)))?;

    Ok(tracing_subscriber::fmt()
        .with_max_level(level)
        .try_init()
        .is_ok())
}

/// 內部方法實現（不暴露給 Python）
fn to_py_err(err: ConvError) -> PyErr {
    let body = ErrorBody::from(&err);
    let message = serde_json::to_string(&body).unwrap_or_else(|_| err.to_string());
    PyValueError::new_err(message)
}

fn parse_json<T: DeserializeOwned>(json: &str) -> PyResult<T> {
    serde_json::from_str(json).map_err(|e| PyValueError::new_err(format!("無法解析 JSON: {}", e)))
}

fn to_json<T: Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value)
        .map_err(|e| PyValueError::new_err(format!("無法序列化結果: {}", e)))
}

fn parse_decimal(text: &str) -> PyResult<Decimal> {
    text.trim()
        .parse::<Decimal>()
        .map_err(|_| PyValueError::new_err(format!("無效的數量: {:?}", text)))
}
