use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{AppError, Result};

/// Splits a comma separated size list into trimmed tokens.
///
/// Returns `None` when nothing but whitespace and separators was entered.
pub fn get_sizes(input: &str) -> Option<Vec<String>> {
    let sizes: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|size| !size.is_empty())
        .map(str::to_string)
        .collect();

    if sizes.is_empty() { None } else { Some(sizes) }
}

/// Display label for the picked colors: lowercase hex of each value, unpadded
/// and without separators.
pub fn format_colors(colors: &[u32]) -> String {
    colors.iter().map(|color| format!("{:x}", color)).collect()
}

/// Parses a color as entered by the operator.
///
/// Accepts `#AARRGGBB` or `0xAARRGGBB`, six digit `#RRGGBB` (made opaque), a
/// decimal value either unsigned or as a signed 32-bit ARGB int, and bare
/// `AARRGGBB` when it holds at least one of `a-f`. Bare digits are decimal.
pub fn parse_color(input: &str) -> Result<u32> {
    let input = input.trim();
    let invalid = || AppError::ValidationError(format!("Invalid color value: {}", input));

    let hex = input
        .strip_prefix('#')
        .or_else(|| input.strip_prefix("0x"))
        .or_else(|| input.strip_prefix("0X"));

    if let Some(digits) = hex {
        return parse_hex_color(digits).ok_or_else(invalid);
    }

    let unsigned = input.strip_prefix('-').unwrap_or(input);
    if !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return input
            .parse::<u32>()
            .or_else(|_| input.parse::<i32>().map(|signed| signed as u32))
            .map_err(|_| invalid());
    }

    if input.len() == 8 {
        return parse_hex_color(input).ok_or_else(invalid);
    }

    Err(invalid())
}

fn parse_hex_color(digits: &str) -> Option<u32> {
    let value = u32::from_str_radix(digits, 16).ok()?;
    match digits.len() {
        6 => Some(0xFF00_0000 | value),
        8 => Some(value),
        _ => None,
    }
}

/// Parses a trimmed decimal field, naming the field in the error.
pub fn parse_decimal(field: &str, input: &str) -> Result<Decimal> {
    let input = input.trim();
    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .map_err(|_| AppError::ValidationError(format!("{} must be a number", field)))
}
