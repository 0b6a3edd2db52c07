//! 邊界輸入數量檢查

use std::str::FromStr;

use rust_decimal::Decimal;
use uconv_core::{ConvError, EngineConfig, Result};

/// 解析並檢查外部傳入的數量字串
///
/// 規則：必須是十進位數字、大於零，且整數位數與小數位數
/// （去除尾端 0 之後）不超過配置上限。
pub fn parse_quantity(text: &str, config: &EngineConfig) -> Result<Decimal> {
    let trimmed = text.trim();
    let quantity = Decimal::from_str(trimmed)
        .map_err(|_| ConvError::InvalidQuantity(format!("無法解析數量: {:?}", text)))?;

    // 超過 28 位有效數字的輸入在解析時會被捨入，位數以原始字串為準
    check_literal_digits(trimmed, config)?;
    check_quantity(quantity, config)?;
    Ok(quantity)
}

/// 依原始數字字串檢查整數位數與小數位數（忽略前導與尾端的 0）
fn check_literal_digits(literal: &str, config: &EngineConfig) -> Result<()> {
    let unsigned = literal.trim_start_matches(|c| c == '+' || c == '-');
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let integer_digits = count_digits(integer.trim_start_matches(|c| c == '0' || c == '_'));
    let fraction_digits = count_digits(fraction.trim_end_matches(|c| c == '0' || c == '_'));

    if fraction_digits > config.max_fraction_digits {
        return Err(ConvError::InvalidQuantity(format!(
            "小數位數超過 {} 位: {}",
            config.max_fraction_digits, literal
        )));
    }
    if integer_digits > config.max_integer_digits {
        return Err(ConvError::InvalidQuantity(format!(
            "整數位數超過 {} 位: {}",
            config.max_integer_digits, literal
        )));
    }

    Ok(())
}

fn count_digits(text: &str) -> u32 {
    text.chars().filter(char::is_ascii_digit).count() as u32
}

/// 檢查數量是否符合邊界限制
pub fn check_quantity(quantity: Decimal, config: &EngineConfig) -> Result<()> {
    if quantity <= Decimal::ZERO {
        return Err(ConvError::InvalidQuantity(format!(
            "數量必須大於零: {}",
            quantity
        )));
    }

    let normalized = quantity.normalize();
    if normalized.scale() > config.max_fraction_digits {
        return Err(ConvError::InvalidQuantity(format!(
            "小數位數超過 {} 位: {}",
            config.max_fraction_digits, quantity
        )));
    }

    let integer_digits = integer_digits(normalized);
    if integer_digits > config.max_integer_digits {
        return Err(ConvError::InvalidQuantity(format!(
            "整數位數超過 {} 位: {}",
            config.max_integer_digits, quantity
        )));
    }

    Ok(())
}

/// 整數部分的位數（0.x 視為 0 位）
fn integer_digits(quantity: Decimal) -> u32 {
    let integer_part = quantity.trunc().abs();
    if integer_part.is_zero() {
        0
    } else {
        integer_part.normalize().to_string().len() as u32
    }
}
