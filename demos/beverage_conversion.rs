//! 飲料原料換算示例

use rust_decimal::Decimal;
use uconv::prelude::*;
use uconv::{ConvertRequest, PathRequest};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== 飲料原料換算示例 ===\n");

    // 登錄單位與物料
    let registry = InMemoryRegistry::new()
        .with_unit(Unit::new("ml", "毫升", UnitCategory::Volume))
        .with_unit(Unit::new("L", "公升", UnitCategory::Volume))
        .with_unit(Unit::new("bottle", "瓶", UnitCategory::Volume).with_display_scale(3))
        .with_unit(Unit::new("case", "箱", UnitCategory::Volume))
        .with_material(Material::new("SYRUP", "ml", "bottle").with_override_rate(Decimal::from(500)))
        .with_material(Material::new("MILK", "ml", "L").with_prefer_global(true));

    let service =
        ConversionService::new(registry, InMemoryRuleStore::new(), EngineConfig::default())?;

    // 全域換算規則
    service.create_rule(ConversionRule::new("L", "ml", Decimal::from(1000), UnitCategory::Volume))?;
    service.create_rule(ConversionRule::new("bottle", "ml", Decimal::from(750), UnitCategory::Volume))?;
    service.create_rule(ConversionRule::new("case", "bottle", Decimal::from(12), UnitCategory::Volume))?;

    // 循環規則會被拒絕
    if let Err(err) = service.create_rule(ConversionRule::new(
        "ml",
        "case",
        Decimal::new(1, 4),
        UnitCategory::Volume,
    )) {
        println!("拒絕規則: {}", err);
    }

    println!("\n換算結果:");
    let requests = [
        ConvertRequest::new("bottle", "ml", "2").with_material("SYRUP"),
        ConvertRequest::new("bottle", "ml", "2"),
        ConvertRequest::new("case", "L", "1.5"),
        ConvertRequest::new("L", "ml", "0.25").with_material("MILK"),
    ];
    for request in &requests {
        match service.convert(request) {
            Ok(response) => println!(
                "  {} {} → {} {} [{}]",
                request.quantity,
                request.from_unit,
                response.converted_quantity,
                request.to_unit,
                response.provenance
            ),
            Err(err) => println!("  {} {} → {}: {}", request.quantity, request.from_unit, request.to_unit, err),
        }
    }

    let path = service.calculate_path(&PathRequest {
        from_unit: "case".into(),
        to_unit: "L".into(),
    })?;
    println!("\n路徑 case → L: {:?} (總換算率 {:?}, {} 步)", path.path, path.total_rate, path.steps);

    // BOM 需求：每杯 0.3 瓶糖漿，生產 120 杯
    let total = service.required_quantity(
        "SYRUP",
        Decimal::new(3, 1),
        "bottle",
        "ml",
        Decimal::from(120),
    )?;
    let ml = service
        .registry()
        .unit("ml")?
        .ok_or_else(|| anyhow::anyhow!("找不到單位 ml"))?;
    println!("\nSYRUP 總需求量: {}", ml.format_quantity(total));

    Ok(())
}
