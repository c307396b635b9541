use serde_json::Value;

use super::error::FilterError;
use super::filter::Filter;
use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Accepts `"col [asc|desc], col2 ..."`
    pub fn validate_and_parse(order: &Value) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let spec = order
            .as_str()
            .ok_or_else(|| FilterError::InvalidOrder("ORDER must be a string".to_string()))?;

        let mut infos = Vec::new();
        for part in spec.split(',') {
            let mut tokens = part.split_whitespace();
            let Some(column) = tokens.next() else { continue };
            Filter::validate_identifier(column)?;

            let sort = match tokens.next() {
                None => SortDirection::Asc,
                Some(dir) if dir.eq_ignore_ascii_case("asc") => SortDirection::Asc,
                Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
                Some(dir) => return Err(FilterError::InvalidOrder(format!("unknown direction: {}", dir))),
            };
            infos.push(FilterOrderInfo {
                column: column.to_string(),
                sort,
            });
        }
        Ok(infos)
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}
