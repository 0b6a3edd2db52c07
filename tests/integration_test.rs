//! 集成測試

use rstest::rstest;
use rust_decimal::Decimal;
use std::str::FromStr;
use uconv::prelude::*;
use uconv::{ConvertRequest, CycleRequest, ErrorBody, PathRequest};

fn dec(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap()
}

fn volume(from: &str, to: &str, rate: i64) -> ConversionRule {
    ConversionRule::new(from, to, Decimal::from(rate), UnitCategory::Volume)
}

/// 飲料店的基本資料：
/// - 全域規則 1 L = 1000 ml、1 bottle = 750 ml
/// - SYRUP 專屬換算率 1 bottle = 500 ml
/// - MILK 無專屬換算率，使用全域規則
/// - TEA 完全未設定
fn beverage_service() -> ConversionService<InMemoryRegistry, InMemoryRuleStore> {
    let registry = InMemoryRegistry::new()
        .with_unit(Unit::new("ml", "毫升", UnitCategory::Volume))
        .with_unit(Unit::new("L", "公升", UnitCategory::Volume))
        .with_unit(Unit::new("bottle", "瓶", UnitCategory::Volume))
        .with_unit(Unit::new("kg", "公斤", UnitCategory::Weight))
        .with_unit(Unit::new("g", "克", UnitCategory::Weight))
        .with_material(Material::new("SYRUP", "ml", "bottle").with_override_rate(Decimal::from(500)))
        .with_material(Material::new("MILK", "ml", "bottle").with_prefer_global(true))
        .with_material(Material::new("TEA", "ml", "bottle"));

    let service =
        ConversionService::new(registry, InMemoryRuleStore::new(), EngineConfig::default())
            .unwrap();
    service.create_rule(volume("L", "ml", 1000)).unwrap();
    service.create_rule(volume("bottle", "ml", 750)).unwrap();
    service
        .create_rule(ConversionRule::new(
            "kg",
            "g",
            Decimal::from(1000),
            UnitCategory::Weight,
        ))
        .unwrap();
    service
}

/// u0 → u1 → ... → u{n-1}，每段換算率 2
fn chain_service(units: usize) -> ConversionService<InMemoryRegistry, InMemoryRuleStore> {
    let mut registry = InMemoryRegistry::new();
    for i in 0..units {
        registry.insert_unit(Unit::new(format!("u{}", i), format!("U{}", i), UnitCategory::Quantity));
    }

    let service =
        ConversionService::new(registry, InMemoryRuleStore::new(), EngineConfig::default())
            .unwrap();
    for i in 0..units - 1 {
        service
            .create_rule(ConversionRule::new(
                format!("u{}", i),
                format!("u{}", i + 1),
                Decimal::from(2),
                UnitCategory::Quantity,
            ))
            .unwrap();
    }
    service
}

#[test]
fn test_material_override_takes_priority() {
    let service = beverage_service();

    let result = service
        .resolve("bottle", "ml", Decimal::from(2), Some("SYRUP"))
        .unwrap();

    assert_eq!(result.converted_quantity, Decimal::from(1000));
    assert_eq!(result.source, ConversionSource::Material);
    assert!(result.path.is_none());

    // 不指定物料時使用全域規則
    let result = service.resolve("bottle", "ml", Decimal::from(2), None).unwrap();
    assert_eq!(result.converted_quantity, Decimal::from(1500));
    assert_eq!(result.source, ConversionSource::Global);
}

#[test]
fn test_fallback_to_global_when_preferred() {
    let service = beverage_service();

    let result = service
        .resolve("bottle", "ml", Decimal::from(2), Some("MILK"))
        .unwrap();

    assert_eq!(result.converted_quantity, Decimal::from(1500));
    assert_eq!(result.source, ConversionSource::Global);
}

#[test]
fn test_unconfigured_material_fails() {
    let err = beverage_service()
        .resolve("bottle", "ml", Decimal::ONE, Some("TEA"))
        .unwrap_err();

    assert_eq!(
        err,
        ConvError::ConversionNotConfigured {
            material_id: "TEA".into()
        }
    );
}

#[test]
fn test_unknown_material_and_unit() {
    let service = beverage_service();

    let err = service
        .resolve("bottle", "ml", Decimal::ONE, Some("GHOST"))
        .unwrap_err();
    assert_eq!(err.code(), "MATERIAL_NOT_FOUND");

    let err = service.resolve("gallon", "ml", Decimal::ONE, None).unwrap_err();
    assert_eq!(err, ConvError::UnknownUnit("gallon".into()));
}

#[test]
fn test_identity_conversion() {
    let result = beverage_service()
        .resolve("ml", "ml", dec("42.125"), None)
        .unwrap();

    assert_eq!(result.converted_quantity, dec("42.125"));
    assert_eq!(result.steps(), 0);
}

#[test]
fn test_multi_hop_path_and_provenance() {
    let service = beverage_service();

    let result = service.resolve("bottle", "L", Decimal::from(4), None).unwrap();

    assert_eq!(result.converted_quantity, Decimal::from(3));
    assert_eq!(result.steps(), 2);
    assert_eq!(
        result.path.as_ref().unwrap().units,
        vec!["bottle", "ml", "L"]
    );
    assert_eq!(
        result.provenance,
        "global: bottle -> ml -> L (rate 0.75, 2 steps)"
    );
}

#[test]
fn test_reverse_conversion_uses_inverse_rate() {
    let service = beverage_service();

    let forward = service.resolve("L", "ml", dec("1.234567"), None).unwrap();
    assert_eq!(forward.converted_quantity, dec("1234.567"));

    let back = service
        .resolve("ml", "L", forward.converted_quantity, None)
        .unwrap();
    assert_eq!(back.converted_quantity, dec("1.234567"));
}

#[test]
fn test_cross_category_has_no_path() {
    let service = beverage_service();

    let err = service.resolve("kg", "ml", Decimal::ONE, None).unwrap_err();
    assert!(err.is_not_found());
    assert!(!service.can_convert("kg", "ml", None).unwrap());
    assert!(service.can_convert("g", "kg", None).unwrap());
}

#[rstest]
#[case(2, true)]
#[case(5, true)]
#[case(6, true)]
#[case(7, false)]
#[case(10, false)]
fn test_path_length_limit(#[case] units: usize, #[case] reachable: bool) {
    let service = chain_service(units);
    let target = format!("u{}", units - 1);

    let path = service.find_path("u0", &target).unwrap();

    assert_eq!(path.is_some(), reachable);
    if let Some(path) = path {
        assert_eq!(path.steps, units - 1);
        assert_eq!(path.total_rate, Decimal::from(1u64 << (units - 1)));
    }
}

#[test]
fn test_cycle_rejected_on_write() {
    let service = chain_service(3);

    let err = service
        .create_rule(ConversionRule::new(
            "u2",
            "u0",
            Decimal::from(4),
            UnitCategory::Quantity,
        ))
        .unwrap_err();

    assert_eq!(
        err,
        ConvError::CycleRejected {
            cycle: vec!["u2".into(), "u0".into(), "u1".into(), "u2".into()]
        }
    );
    assert_eq!(service.store().len().unwrap(), 2);
}

#[test]
fn test_update_rule_excludes_itself_from_cycle_check() {
    let service = beverage_service();
    let rule = service
        .store()
        .list_rules()
        .unwrap()
        .into_iter()
        .find(|r| r.from_unit == "bottle")
        .unwrap();

    let mut edited = rule.clone();
    edited.rate = Decimal::from(330);
    let updated = service.update_rule(edited).unwrap();
    assert_eq!(updated.id, rule.id);

    let result = service.resolve("bottle", "ml", Decimal::ONE, None).unwrap();
    assert_eq!(result.converted_quantity, Decimal::from(330));
}

#[test]
fn test_delete_rule_removes_path() {
    let service = beverage_service();
    let rule = service
        .store()
        .list_rules()
        .unwrap()
        .into_iter()
        .find(|r| r.from_unit == "L")
        .unwrap();

    service.delete_rule(rule.id).unwrap();

    assert!(!service.can_convert("bottle", "L", None).unwrap());
    assert_eq!(service.delete_rule(rule.id).unwrap_err().code(), "RULE_NOT_FOUND");
}

#[rstest]
#[case(false, None)]
#[case(true, Some("5000.0"))]
fn test_bom_requirement_scenario(#[case] prefer_global: bool, #[case] expected: Option<&str>) {
    let registry = InMemoryRegistry::new()
        .with_unit(Unit::new("ml", "毫升", UnitCategory::Volume))
        .with_unit(Unit::new("L", "公升", UnitCategory::Volume))
        .with_unit(Unit::new("bottle", "瓶", UnitCategory::Volume))
        .with_material(
            Material::new("M", "ml", "bottle")
                .with_override_rate(Decimal::from(500))
                .with_prefer_global(prefer_global),
        );
    let service =
        ConversionService::new(registry, InMemoryRuleStore::new(), EngineConfig::default())
            .unwrap();
    service.create_rule(volume("L", "ml", 1000)).unwrap();

    let result = service.required_quantity("M", dec("0.5"), "L", "ml", Decimal::from(10));

    match expected {
        Some(total) => assert_eq!(result.unwrap(), dec(total)),
        None => assert_eq!(result.unwrap_err().code(), "UNSUPPORTED_CONVERSION"),
    }
}

#[test]
fn test_requests_through_service() {
    let service = beverage_service();

    let request: ConvertRequest = serde_json::from_str(
        r#"{ "fromUnit": "bottle", "toUnit": "ml", "quantity": "3", "materialId": "SYRUP" }"#,
    )
    .unwrap();
    let response = service.convert(&request).unwrap();
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["source"], "MATERIAL");
    assert_eq!(response.converted_quantity, Decimal::from(1500));

    let path = service
        .calculate_path(&PathRequest {
            from_unit: "L".into(),
            to_unit: "bottle".into(),
        })
        .unwrap();
    assert!(path.found);
    assert_eq!(path.steps, 2);

    let cycle = service
        .validate_cycle(&CycleRequest {
            from_unit: "ml".into(),
            to_unit: "bottle".into(),
            exclude_rule_id: None,
        })
        .unwrap();
    assert!(!cycle.valid);
    assert_eq!(cycle.cycle_path.unwrap(), vec!["ml", "bottle", "ml"]);

    let err = service
        .convert(&ConvertRequest::new("L", "ml", "12345678901"))
        .unwrap_err();
    let body = ErrorBody::from(&err);
    assert_eq!(body.code, "INVALID_QUANTITY");

    // 超出 Decimal 精度的輸入不會被捨入後放行
    let err = service
        .convert(&ConvertRequest::new("L", "ml", "1.00000000000000000000000000001"))
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_QUANTITY");
}
