//! 上游資料來源介面：單位/物料查詢與換算規則列表

use std::collections::HashMap;
use std::sync::Arc;

use crate::{ConversionRule, Material, Result, Unit};

/// 單位與物料查詢（對換算引擎唯讀）
pub trait Registry {
    /// 依代碼查詢單位
    fn unit(&self, code: &str) -> Result<Option<Unit>>;

    /// 依ID查詢物料
    fn material(&self, id: &str) -> Result<Option<Material>>;
}

/// 換算規則列表（全域換算圖的邊集合）
pub trait RuleStore {
    /// 讀取目前全部規則（每次呼叫視為一個時間點快照）
    fn list_rules(&self) -> Result<Vec<ConversionRule>>;
}

impl<T: Registry + ?Sized> Registry for &T {
    fn unit(&self, code: &str) -> Result<Option<Unit>> {
        (**self).unit(code)
    }

    fn material(&self, id: &str) -> Result<Option<Material>> {
        (**self).material(id)
    }
}

impl<T: Registry + ?Sized> Registry for Arc<T> {
    fn unit(&self, code: &str) -> Result<Option<Unit>> {
        (**self).unit(code)
    }

    fn material(&self, id: &str) -> Result<Option<Material>> {
        (**self).material(id)
    }
}

impl<T: RuleStore + ?Sized> RuleStore for &T {
    fn list_rules(&self) -> Result<Vec<ConversionRule>> {
        (**self).list_rules()
    }
}

impl<T: RuleStore + ?Sized> RuleStore for Arc<T> {
    fn list_rules(&self) -> Result<Vec<ConversionRule>> {
        (**self).list_rules()
    }
}

/// 記憶體內的單位/物料登錄表
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    units: HashMap<String, Unit>,
    materials: HashMap<String, Material>,
}

impl InMemoryRegistry {
    /// 創建空的登錄表
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：加入單位
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.insert_unit(unit);
        self
    }

    /// 建構器模式：加入物料
    pub fn with_material(mut self, material: Material) -> Self {
        self.insert_material(material);
        self
    }

    /// 加入或取代單位
    pub fn insert_unit(&mut self, unit: Unit) {
        self.units.insert(unit.code.clone(), unit);
    }

    /// 加入或取代物料
    pub fn insert_material(&mut self, material: Material) {
        self.materials.insert(material.id.clone(), material);
    }

    /// 單位數量
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// 物料數量
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}

impl Registry for InMemoryRegistry {
    fn unit(&self, code: &str) -> Result<Option<Unit>> {
        Ok(self.units.get(code).cloned())
    }

    fn material(&self, id: &str) -> Result<Option<Material>> {
        Ok(self.materials.get(id).cloned())
    }
}
