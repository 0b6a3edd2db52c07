//! # uconv
//!
//! 單位換算引擎：物料專屬換算率優先、全域規則多段路徑、規則寫入循環檢測。
//!
//! ```no_run
//! use rust_decimal::Decimal;
//! use uconv::prelude::*;
//!
//! let registry = InMemoryRegistry::new()
//!     .with_unit(Unit::new("L", "公升", UnitCategory::Volume))
//!     .with_unit(Unit::new("ml", "毫升", UnitCategory::Volume));
//! let service =
//!     ConversionService::new(registry, InMemoryRuleStore::new(), EngineConfig::default())?;
//! service.create_rule(ConversionRule::new("L", "ml", Decimal::from(1000), UnitCategory::Volume))?;
//!
//! let result = service.resolve("L", "ml", Decimal::from(2), None)?;
//! assert_eq!(result.converted_quantity, Decimal::from(2000));
//! # Ok::<(), uconv::ConvError>(())
//! ```

pub use uconv_calc::*;
pub use uconv_core::*;

/// 常用類型
pub mod prelude {
    pub use uconv_calc::{
        ConversionPlan, ConversionResolver, ConversionService, CycleCheck, CycleDetector,
        InMemoryRuleStore, PathFinder, RequirementCalculator, RequirementLine, RuleGraph,
    };
    pub use uconv_core::{
        ConvError, ConversionPath, ConversionResult, ConversionRule, ConversionSource,
        EngineConfig, InMemoryRegistry, Material, Registry, RuleStore, Unit, UnitCategory,
    };
}
