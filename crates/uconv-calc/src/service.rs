//! 換算服務：對外操作的入口
//!
//! 每次呼叫都重新讀取規則列表並建立圖快照，同一次呼叫內讀取一致，
//! 不同呼叫之間不共享可變狀態。

use rust_decimal::Decimal;
use uconv_core::{
    ConversionPath, ConversionResult, ConversionRule, EngineConfig, Registry, Result, RuleStore,
};
use uuid::Uuid;

use crate::cycle::{CycleCheck, CycleDetector};
use crate::dto::{
    ConvertRequest, ConvertResponse, CycleRequest, CycleValidationResponse, PathRequest,
    PathResponse,
};
use crate::graph::RuleGraph;
use crate::path::PathFinder;
use crate::requirement::{RequirementCalculator, RequirementLine};
use crate::resolver::ConversionResolver;
use crate::rule_store::InMemoryRuleStore;
use crate::validation::parse_quantity;

/// 換算服務
pub struct ConversionService<R: Registry, S: RuleStore> {
    registry: R,
    store: S,
    config: EngineConfig,
}

impl<R: Registry, S: RuleStore> ConversionService<R, S> {
    /// 創建換算服務（配置無效時回傳錯誤）
    pub fn new(registry: R, store: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry,
            store,
            config,
        })
    }

    /// 獲取登錄表引用
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// 獲取登錄表可變引用
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// 獲取規則存放區引用
    pub fn store(&self) -> &S {
        &self.store
    }

    /// 獲取引擎配置引用
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 讀取規則並建立雙向圖快照
    fn conversion_graph(&self) -> Result<RuleGraph> {
        let rules = self.store.list_rules()?;
        let graph = RuleGraph::bidirectional(&rules)?;
        tracing::debug!(
            "建立規則圖快照: {} 條規則，{} 條邊",
            rules.len(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// 換算數量（數量已是 Decimal，只檢查非負）
    pub fn resolve(
        &self,
        from: &str,
        to: &str,
        quantity: Decimal,
        material_id: Option<&str>,
    ) -> Result<ConversionResult> {
        let graph = self.conversion_graph()?;
        ConversionResolver::new(&self.registry, &self.config).resolve(
            &graph,
            from,
            to,
            quantity,
            material_id,
        )
    }

    /// 換算請求（數量字串先經邊界檢查）
    pub fn convert(&self, request: &ConvertRequest) -> Result<ConvertResponse> {
        let quantity = parse_quantity(&request.quantity, &self.config)?;

        tracing::debug!(
            "換算請求: {} {} → {} (物料 {:?})",
            quantity,
            request.from_unit,
            request.to_unit,
            request.material_id
        );

        self.resolve(
            &request.from_unit,
            &request.to_unit,
            quantity,
            request.material_id.as_deref(),
        )
        .map(ConvertResponse::from)
    }

    /// 檢查是否可換算
    ///
    /// 任何資料或設定造成的失敗都回傳 `false`；只有資料來源故障會回傳錯誤。
    pub fn can_convert(&self, from: &str, to: &str, material_id: Option<&str>) -> Result<bool> {
        match self.resolve(from, to, Decimal::ONE, material_id) {
            Ok(_) => Ok(true),
            Err(err) if err.is_store_failure() => Err(err),
            Err(err) => {
                tracing::debug!("無法換算 {} → {}: {}", from, to, err);
                Ok(false)
            }
        }
    }

    /// 搜尋最短換算路徑
    pub fn find_path(&self, from: &str, to: &str) -> Result<Option<ConversionPath>> {
        let graph = self.conversion_graph()?;
        PathFinder::from_config(&self.config).find_path(&graph, from, to)
    }

    /// 路徑查詢請求
    pub fn calculate_path(&self, request: &PathRequest) -> Result<PathResponse> {
        self.find_path(&request.from_unit, &request.to_unit)
            .map(PathResponse::from)
    }

    /// 檢查候選規則是否形成循環
    pub fn would_create_cycle(
        &self,
        from: &str,
        to: &str,
        exclude_rule_id: Option<Uuid>,
    ) -> Result<CycleCheck> {
        let rules = self.store.list_rules()?;
        Ok(CycleDetector::would_create_cycle(
            &rules,
            from,
            to,
            exclude_rule_id,
        ))
    }

    /// 循環檢測請求
    pub fn validate_cycle(&self, request: &CycleRequest) -> Result<CycleValidationResponse> {
        self.would_create_cycle(&request.from_unit, &request.to_unit, request.exclude_rule_id)
            .map(CycleValidationResponse::from)
    }

    /// 計算總需求量
    pub fn required_quantity(
        &self,
        material_id: &str,
        per_unit_quantity: Decimal,
        bom_unit: &str,
        target_unit: &str,
        produced_quantity: Decimal,
    ) -> Result<Decimal> {
        let graph = self.conversion_graph()?;
        RequirementCalculator::new(&self.registry, &self.config).required_quantity(
            &graph,
            material_id,
            per_unit_quantity,
            bom_unit,
            target_unit,
            produced_quantity,
        )
    }
}

impl<R: Registry + Sync, S: RuleStore> ConversionService<R, S> {
    /// 平行計算整份 BOM 的需求量（共用同一份規則快照）
    pub fn required_quantities(&self, lines: &[RequirementLine]) -> Result<Vec<Result<Decimal>>> {
        let graph = self.conversion_graph()?;
        Ok(RequirementCalculator::new(&self.registry, &self.config)
            .required_quantities(&graph, lines))
    }
}

impl<R: Registry> ConversionService<R, InMemoryRuleStore> {
    /// 新增規則（經寫入閘門）
    pub fn create_rule(&self, rule: ConversionRule) -> Result<ConversionRule> {
        self.store.create_rule(&self.registry, rule)
    }

    /// 編輯規則（經寫入閘門）
    pub fn update_rule(&self, rule: ConversionRule) -> Result<ConversionRule> {
        self.store.update_rule(&self.registry, rule)
    }

    /// 刪除規則
    pub fn delete_rule(&self, id: Uuid) -> Result<ConversionRule> {
        self.store.delete_rule(id)
    }
}
