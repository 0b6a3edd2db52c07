//! 記憶體內換算規則存放區（含寫入閘門）
//!
//! 新增與編輯規則時，在持有寫入鎖的情況下完成「檢查 → 寫入」，
//! 兩個同時進行的編輯無法各自通過循環檢測後共同形成循環。

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uconv_core::{ConvError, ConversionRule, Registry, Result, RuleStore};
use uuid::Uuid;

use crate::cycle::CycleDetector;

/// 記憶體內換算規則存放區
#[derive(Debug, Default)]
pub struct InMemoryRuleStore {
    rules: RwLock<Vec<ConversionRule>>,
}

impl InMemoryRuleStore {
    /// 創建空的存放區
    pub fn new() -> Self {
        Self::default()
    }

    /// 載入先前已通過檢查的規則（例如從資料庫還原），不重新檢查
    pub fn from_snapshot(rules: Vec<ConversionRule>) -> Self {
        Self {
            rules: RwLock::new(rules),
        }
    }

    /// 新增規則
    pub fn create_rule<R: Registry + ?Sized>(
        &self,
        registry: &R,
        rule: ConversionRule,
    ) -> Result<ConversionRule> {
        let mut rules = self.write()?;

        if rules.iter().any(|r| r.id == rule.id) {
            return Err(ConvError::InvalidRule(format!("規則ID已存在: {}", rule.id)));
        }

        if let Err(err) = validate_candidate(registry, &rules, &rule, None) {
            tracing::warn!(
                "拒絕新增規則 {} → {}: {}",
                rule.from_unit,
                rule.to_unit,
                err
            );
            return Err(err);
        }

        tracing::info!(
            "新增換算規則 {}: 1 {} = {} {}",
            rule.id,
            rule.from_unit,
            rule.rate,
            rule.to_unit
        );
        rules.push(rule.clone());
        Ok(rule)
    }

    /// 編輯規則（以 `rule.id` 定位）
    pub fn update_rule<R: Registry + ?Sized>(
        &self,
        registry: &R,
        rule: ConversionRule,
    ) -> Result<ConversionRule> {
        let mut rules = self.write()?;

        let index = rules
            .iter()
            .position(|r| r.id == rule.id)
            .ok_or(ConvError::RuleNotFound(rule.id))?;

        if let Err(err) = validate_candidate(registry, &rules, &rule, Some(rule.id)) {
            tracing::warn!(
                "拒絕編輯規則 {} ({} → {}): {}",
                rule.id,
                rule.from_unit,
                rule.to_unit,
                err
            );
            return Err(err);
        }

        tracing::info!(
            "編輯換算規則 {}: 1 {} = {} {}",
            rule.id,
            rule.from_unit,
            rule.rate,
            rule.to_unit
        );
        rules[index] = rule.clone();
        Ok(rule)
    }

    /// 刪除規則
    pub fn delete_rule(&self, id: Uuid) -> Result<ConversionRule> {
        let mut rules = self.write()?;

        let index = rules
            .iter()
            .position(|r| r.id == id)
            .ok_or(ConvError::RuleNotFound(id))?;

        let removed = rules.remove(index);
        tracing::info!(
            "刪除換算規則 {}: {} → {}",
            removed.id,
            removed.from_unit,
            removed.to_unit
        );
        Ok(removed)
    }

    /// 規則數量
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// 是否沒有任何規則
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<ConversionRule>>> {
        self.rules
            .read()
            .map_err(|_| ConvError::StoreError("規則存放區讀取鎖已損毀".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<ConversionRule>>> {
        self.rules
            .write()
            .map_err(|_| ConvError::StoreError("規則存放區寫入鎖已損毀".to_string()))
    }
}

impl RuleStore for InMemoryRuleStore {
    fn list_rules(&self) -> Result<Vec<ConversionRule>> {
        Ok(self.read()?.clone())
    }
}

/// 寫入前的完整檢查
///
/// 1. 規則結構（兩端不同、換算率為正）
/// 2. 兩端單位存在且類別與規則一致
/// 3. 無重複的有向單位對
/// 4. 不形成循環
pub fn validate_candidate<R: Registry + ?Sized>(
    registry: &R,
    rules: &[ConversionRule],
    candidate: &ConversionRule,
    exclude: Option<Uuid>,
) -> Result<()> {
    candidate.check_shape()?;

    for code in [&candidate.from_unit, &candidate.to_unit] {
        let unit = registry
            .unit(code)?
            .ok_or_else(|| ConvError::UnknownUnit(code.clone()))?;

        if unit.category != candidate.category {
            return Err(ConvError::InvalidRule(format!(
                "單位 {} 的類別 {:?} 與規則類別 {:?} 不一致",
                unit.code, unit.category, candidate.category
            )));
        }
    }

    let duplicate = rules
        .iter()
        .filter(|r| Some(r.id) != exclude)
        .any(|r| r.connects(&candidate.from_unit, &candidate.to_unit));
    if duplicate {
        return Err(ConvError::DuplicateRule {
            from: candidate.from_unit.clone(),
            to: candidate.to_unit.clone(),
        });
    }

    CycleDetector::would_create_cycle(rules, &candidate.from_unit, &candidate.to_unit, exclude)
        .into_result()
}
