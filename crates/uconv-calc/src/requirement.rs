//! 需求數量計算（BOM 單位用量 × 生產數量）

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uconv_core::{ConvError, EngineConfig, Registry, Result};

use crate::graph::RuleGraph;
use crate::resolver::ConversionResolver;

/// BOM 需求行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementLine {
    /// 物料ID
    pub material_id: String,

    /// 每單位成品的用量（BOM 單位）
    pub per_unit_quantity: Decimal,

    /// BOM 用量單位
    pub bom_unit: String,

    /// 需求輸出單位
    pub target_unit: String,

    /// 生產數量
    pub produced_quantity: Decimal,
}

impl RequirementLine {
    /// 創建新的需求行
    pub fn new(
        material_id: impl Into<String>,
        per_unit_quantity: Decimal,
        bom_unit: impl Into<String>,
        target_unit: impl Into<String>,
        produced_quantity: Decimal,
    ) -> Self {
        Self {
            material_id: material_id.into(),
            per_unit_quantity,
            bom_unit: bom_unit.into(),
            target_unit: target_unit.into(),
            produced_quantity,
        }
    }
}

/// 需求數量計算器
pub struct RequirementCalculator<'a, R: Registry + ?Sized> {
    resolver: ConversionResolver<'a, R>,
}

impl<'a, R: Registry + ?Sized> RequirementCalculator<'a, R> {
    /// 創建新的需求數量計算器
    pub fn new(registry: &'a R, config: &'a EngineConfig) -> Self {
        Self {
            resolver: ConversionResolver::new(registry, config),
        }
    }

    /// 計算總需求量
    ///
    /// 先將單位用量由 `bom_unit` 換算為 `target_unit`（套用物料優先順序），
    /// 再乘以生產數量。除換算本身的四捨五入外不再另行捨入；
    /// 換算失敗時原樣回傳錯誤，不重試也不套用預設換算率。
    pub fn required_quantity(
        &self,
        graph: &RuleGraph,
        material_id: &str,
        per_unit_quantity: Decimal,
        bom_unit: &str,
        target_unit: &str,
        produced_quantity: Decimal,
    ) -> Result<Decimal> {
        if produced_quantity < Decimal::ZERO {
            return Err(ConvError::InvalidQuantity(format!(
                "生產數量不可為負數: {}",
                produced_quantity
            )));
        }

        let converted = self.resolver.resolve(
            graph,
            bom_unit,
            target_unit,
            per_unit_quantity,
            Some(material_id),
        )?;

        let total = converted
            .converted_quantity
            .checked_mul(produced_quantity)
            .ok_or_else(|| {
                ConvError::CalculationError(format!(
                    "需求數量溢位: {} × {}",
                    converted.converted_quantity, produced_quantity
                ))
            })?;

        tracing::debug!(
            "物料 {} 需求: {} {} × {} = {} {}",
            material_id,
            per_unit_quantity,
            bom_unit,
            produced_quantity,
            total,
            target_unit
        );

        Ok(total)
    }

    /// 計算單一需求行
    pub fn calculate_line(&self, graph: &RuleGraph, line: &RequirementLine) -> Result<Decimal> {
        self.required_quantity(
            graph,
            &line.material_id,
            line.per_unit_quantity,
            &line.bom_unit,
            &line.target_unit,
            line.produced_quantity,
        )
    }
}

impl<'a, R: Registry + Sync + ?Sized> RequirementCalculator<'a, R> {
    /// 平行計算整份 BOM 的需求量
    ///
    /// 結果依輸入順序排列；單行失敗不影響其他行。
    pub fn required_quantities(
        &self,
        graph: &RuleGraph,
        lines: &[RequirementLine],
    ) -> Vec<Result<Decimal>> {
        tracing::debug!("平行計算 {} 筆需求行", lines.len());

        lines
            .par_iter()
            .map(|line| self.calculate_line(graph, line))
            .collect()
    }
}
