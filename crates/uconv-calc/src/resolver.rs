//! 換算解析：決定換算依據並計算換算後數量

use rust_decimal::{Decimal, RoundingStrategy};
use uconv_core::{
    ConvError, ConversionResult, EngineConfig, Material, OverrideDirection, Registry, Result,
    Unit,
};

use crate::graph::RuleGraph;
use crate::path::PathFinder;
use crate::priority::ConversionPlan;

/// 換算解析器
///
/// 本身不持有任何可變狀態；規則圖快照由呼叫端在每次呼叫時傳入。
pub struct ConversionResolver<'a, R: Registry + ?Sized> {
    registry: &'a R,
    config: &'a EngineConfig,
}

impl<'a, R: Registry + ?Sized> ConversionResolver<'a, R> {
    /// 創建新的換算解析器
    pub fn new(registry: &'a R, config: &'a EngineConfig) -> Self {
        Self { registry, config }
    }

    /// 換算數量
    ///
    /// 提供 `material_id` 時先套用物料層級的優先順序，
    /// 否則（或物料委派全域時）經由規則圖換算。
    pub fn resolve(
        &self,
        graph: &RuleGraph,
        from: &str,
        to: &str,
        quantity: Decimal,
        material_id: Option<&str>,
    ) -> Result<ConversionResult> {
        if quantity < Decimal::ZERO {
            return Err(ConvError::InvalidQuantity(format!(
                "數量不可為負數: {}",
                quantity
            )));
        }

        self.ensure_unit(from)?;
        self.ensure_unit(to)?;

        if from == to {
            return Ok(ConversionResult::identity(quantity));
        }

        let Some(material_id) = material_id else {
            return self.resolve_global(graph, from, to, quantity);
        };

        let material = self.load_material(material_id)?;

        match ConversionPlan::decide(&material, from, to) {
            ConversionPlan::MaterialOverride { rate, direction } => {
                tracing::debug!(
                    "物料 {} 使用專屬換算率 {}: {} → {}",
                    material.id,
                    rate,
                    from,
                    to
                );
                self.apply_override(&material, rate, direction, quantity)
            }
            ConversionPlan::GlobalDelegate => {
                tracing::debug!("物料 {} 委派全域換算: {} → {}", material.id, from, to);
                self.resolve_global(graph, from, to, quantity)
            }
            ConversionPlan::UnsupportedPair => Err(ConvError::UnsupportedConversion {
                material_id: material.id,
                from: from.to_string(),
                to: to.to_string(),
            }),
            ConversionPlan::Unconfigured => Err(ConvError::ConversionNotConfigured {
                material_id: material.id,
            }),
        }
    }

    /// 僅經由全域規則圖換算
    pub fn resolve_global(
        &self,
        graph: &RuleGraph,
        from: &str,
        to: &str,
        quantity: Decimal,
    ) -> Result<ConversionResult> {
        if from == to {
            return Ok(ConversionResult::identity(quantity));
        }

        let path = PathFinder::from_config(self.config)
            .find_path(graph, from, to)?
            .ok_or_else(|| ConvError::PathNotFound {
                from: from.to_string(),
                to: to.to_string(),
            })?;

        let converted = quantity.checked_mul(path.total_rate).ok_or_else(|| {
            ConvError::CalculationError(format!(
                "換算結果溢位: {} × {}",
                quantity, path.total_rate
            ))
        })?;

        Ok(ConversionResult::from_global(self.round(converted), path))
    }

    /// 套用物料專屬換算率
    fn apply_override(
        &self,
        material: &Material,
        rate: Decimal,
        direction: OverrideDirection,
        quantity: Decimal,
    ) -> Result<ConversionResult> {
        let (converted, suffix) = match direction {
            OverrideDirection::PurchaseToInventory => (quantity.checked_mul(rate), ""),
            OverrideDirection::InventoryToPurchase => (quantity.checked_div(rate), " (inverse)"),
        };

        let converted = converted.ok_or_else(|| {
            ConvError::CalculationError(format!(
                "物料 {} 換算溢位: {} / 換算率 {}",
                material.id, quantity, rate
            ))
        })?;

        let provenance = format!(
            "material {}: 1 {} = {} {}{}",
            material.id,
            material.purchase_unit,
            rate.normalize(),
            material.inventory_unit,
            suffix
        );

        Ok(ConversionResult::from_material(self.round(converted), provenance))
    }

    /// 結果四捨五入（所有換算數量皆非負，等同 half-up）
    fn round(&self, quantity: Decimal) -> Decimal {
        quantity.round_dp_with_strategy(self.config.result_scale, RoundingStrategy::MidpointAwayFromZero)
    }

    fn ensure_unit(&self, code: &str) -> Result<Unit> {
        self.registry
            .unit(code)?
            .ok_or_else(|| ConvError::UnknownUnit(code.to_string()))
    }

    fn load_material(&self, id: &str) -> Result<Material> {
        self.registry
            .material(id)?
            .ok_or_else(|| ConvError::MaterialNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use uconv_core::{ConversionRule, ConversionSource, InMemoryRegistry, UnitCategory};

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    fn registry() -> InMemoryRegistry {
        InMemoryRegistry::new()
            .with_unit(Unit::new("ml", "毫升", UnitCategory::Volume))
            .with_unit(Unit::new("L", "公升", UnitCategory::Volume))
            .with_unit(Unit::new("bottle", "瓶", UnitCategory::Volume))
            .with_unit(Unit::new("kg", "公斤", UnitCategory::Weight))
            .with_material(
                Material::new("SYRUP", "ml", "bottle").with_override_rate(Decimal::from(500)),
            )
            .with_material(Material::new("MILK", "ml", "bottle").with_prefer_global(true))
            .with_material(Material::new("TEA", "ml", "bottle"))
    }

    fn graph() -> RuleGraph {
        RuleGraph::bidirectional(&[
            ConversionRule::new("L", "ml", Decimal::from(1000), UnitCategory::Volume),
            ConversionRule::new("bottle", "ml", Decimal::from(750), UnitCategory::Volume),
        ])
        .unwrap()
    }

    #[test]
    fn test_identity_conversion() {
        let registry = registry();
        let config = EngineConfig::default();
        let resolver = ConversionResolver::new(&registry, &config);

        let result = resolver
            .resolve(&graph(), "ml", "ml", dec("12.5"), Some("SYRUP"))
            .unwrap();

        assert_eq!(result.converted_quantity, dec("12.5"));
        assert_eq!(result.source, ConversionSource::Global);
        assert_eq!(result.provenance, "identity");
        assert_eq!(result.steps(), 0);
    }

    #[test]
    fn test_material_override_wins_over_global_rule() {
        let registry = registry();
        let config = EngineConfig::default();
        let resolver = ConversionResolver::new(&registry, &config);

        // 全域規則是 1 bottle = 750 ml，物料專屬換算率是 500
        let result = resolver
            .resolve(&graph(), "bottle", "ml", Decimal::from(2), Some("SYRUP"))
            .unwrap();

        assert_eq!(result.converted_quantity, Decimal::from(1000));
        assert_eq!(result.source, ConversionSource::Material);
        assert_eq!(result.provenance, "material SYRUP: 1 bottle = 500 ml");
    }

    #[test]
    fn test_material_inverse_rounds_half_up() {
        let registry = InMemoryRegistry::new()
            .with_unit(Unit::new("ml", "毫升", UnitCategory::Volume))
            .with_unit(Unit::new("bottle", "瓶", UnitCategory::Volume))
            .with_material(
                Material::new("M", "ml", "bottle").with_override_rate(Decimal::from(3)),
            );
        let config = EngineConfig::default();
        let resolver = ConversionResolver::new(&registry, &config);

        let result = resolver
            .resolve(&RuleGraph::default(), "ml", "bottle", Decimal::from(2), Some("M"))
            .unwrap();

        // 2 / 3 = 0.6666...→ 0.666667
        assert_eq!(result.converted_quantity, dec("0.666667"));
        assert!(result.provenance.ends_with("(inverse)"));
    }

    #[test]
    fn test_material_other_pair_unsupported() {
        let registry = registry();
        let config = EngineConfig::default();
        let resolver = ConversionResolver::new(&registry, &config);

        let err = resolver
            .resolve(&graph(), "L", "ml", Decimal::ONE, Some("SYRUP"))
            .unwrap_err();

        assert_eq!(
            err,
            ConvError::UnsupportedConversion {
                material_id: "SYRUP".into(),
                from: "L".into(),
                to: "ml".into(),
            }
        );
    }

    #[test]
    fn test_material_delegates_to_global() {
        let registry = registry();
        let config = EngineConfig::default();
        let resolver = ConversionResolver::new(&registry, &config);
        let graph = graph();

        let via_material = resolver
            .resolve(&graph, "bottle", "ml", Decimal::from(2), Some("MILK"))
            .unwrap();
        let direct = resolver
            .resolve(&graph, "bottle", "ml", Decimal::from(2), None)
            .unwrap();

        assert_eq!(via_material, direct);
        assert_eq!(via_material.converted_quantity, Decimal::from(1500));
        assert_eq!(via_material.source, ConversionSource::Global);
    }

    #[test]
    fn test_material_unconfigured() {
        let registry = registry();
        let config = EngineConfig::default();
        let resolver = ConversionResolver::new(&registry, &config);

        let err = resolver
            .resolve(&graph(), "bottle", "ml", Decimal::ONE, Some("TEA"))
            .unwrap_err();

        assert_eq!(err.code(), "CONVERSION_NOT_CONFIGURED");
    }

    #[test]
    fn test_unknown_material_and_unit() {
        let registry = registry();
        let config = EngineConfig::default();
        let resolver = ConversionResolver::new(&registry, &config);

        let err = resolver
            .resolve(&graph(), "bottle", "ml", Decimal::ONE, Some("NOPE"))
            .unwrap_err();
        assert_eq!(err, ConvError::MaterialNotFound("NOPE".into()));

        let err = resolver
            .resolve(&graph(), "gallon", "ml", Decimal::ONE, None)
            .unwrap_err();
        assert_eq!(err, ConvError::UnknownUnit("gallon".into()));
    }

    #[test]
    fn test_global_multi_hop() {
        let registry = registry();
        let config = EngineConfig::default();
        let resolver = ConversionResolver::new(&registry, &config);

        // 3 bottle = 2250 ml = 2.25 L
        let result = resolver
            .resolve(&graph(), "bottle", "L", Decimal::from(3), None)
            .unwrap();

        assert_eq!(result.converted_quantity, dec("2.25"));
        assert_eq!(result.steps(), 2);
        assert_eq!(
            result.provenance,
            "global: bottle -> ml -> L (rate 0.75, 2 steps)"
        );
    }

    #[test]
    fn test_global_path_not_found() {
        let registry = registry();
        let config = EngineConfig::default();
        let resolver = ConversionResolver::new(&registry, &config);

        let err = resolver
            .resolve(&graph(), "kg", "ml", Decimal::ONE, None)
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let registry = registry();
        let config = EngineConfig::default();
        let resolver = ConversionResolver::new(&registry, &config);

        let err = resolver
            .resolve(&graph(), "L", "ml", Decimal::from(-1), None)
            .unwrap_err();

        assert_eq!(err.code(), "INVALID_QUANTITY");
    }

    #[test]
    fn test_zero_quantity_allowed() {
        let registry = registry();
        let config = EngineConfig::default();
        let resolver = ConversionResolver::new(&registry, &config);

        let result = resolver
            .resolve(&graph(), "L", "ml", Decimal::ZERO, None)
            .unwrap();

        assert_eq!(result.converted_quantity, Decimal::ZERO);
    }
}
