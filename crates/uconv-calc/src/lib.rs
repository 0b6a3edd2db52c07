//! # Unit Conversion Engine
//!
//! 換算解析與路徑搜尋引擎

pub mod cycle;
pub mod dto;
pub mod graph;
pub mod path;
pub mod priority;
pub mod requirement;
pub mod resolver;
pub mod rule_store;
pub mod service;
pub mod validation;

// Re-export 主要類型
pub use cycle::{CycleCheck, CycleDetector};
pub use dto::{
    ConvertRequest, ConvertResponse, CycleRequest, CycleValidationResponse, ErrorBody,
    PathRequest, PathResponse,
};
pub use graph::RuleGraph;
pub use path::PathFinder;
pub use priority::ConversionPlan;
pub use requirement::{RequirementCalculator, RequirementLine};
pub use resolver::ConversionResolver;
pub use rule_store::InMemoryRuleStore;
pub use service::ConversionService;
pub use validation::parse_quantity;
