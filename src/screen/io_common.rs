// Helpers shared by the sheet readers.

use score_table::CellValue;

/// Typed interpretation of a free-form text cell. This mirrors what the
/// Excel reader hands over for native cells, so a CSV export of a
/// workbook screens the same way as the workbook itself.
pub fn cell_from_str(s: &str) -> CellValue {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Int(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return CellValue::Float(f);
    }
    match trimmed {
        "true" => CellValue::Bool(true),
        "false" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}
