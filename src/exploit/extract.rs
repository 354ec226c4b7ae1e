use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::Value;

/// Seed rows that a tautology payload drags into the result set alongside
/// the unioned catalog rows; filtered out when guessing table names.
pub const SEED_LITERALS: &[&str] = &["SERVER-01", "WORKSTATION-05", "LAPTOP-12"];

/// One row of the search response. The backend always answers with the
/// three columns of its base query, so a UNION arm's values land
/// positionally: the first under `id`, the second under `computer_name`,
/// the third under `ip_address`. Model that contract explicitly instead of
/// guessing from whichever keys look populated.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRow {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub computer_name: Value,
    #[serde(default)]
    pub ip_address: Value,
}

impl SearchRow {
    /// Positional text view of the row: 0, 1, 2 map onto the three result
    /// columns. Null and missing values come back as None.
    pub fn text(&self, pos: usize) -> Option<String> {
        let value = match pos {
            0 => &self.id,
            1 => &self.computer_name,
            2 => &self.ip_address,
            _ => return None,
        };
        match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Table-name guess for one row of the pg_tables payload: the unioned name
/// lands in position 0, but genuine computer rows carry their name in
/// position 1, so prefer that for recognizing (and dropping) seed data.
fn table_name_guess(row: &SearchRow) -> Option<String> {
    row.text(1).or_else(|| row.text(0))
}

/// Distills a sorted, deduplicated table list from a tables-payload
/// response, dropping the known seed literals.
pub fn table_names(rows: &[SearchRow]) -> Vec<String> {
    let mut tables = BTreeSet::new();
    for row in rows {
        if let Some(name) = table_name_guess(row) {
            if !SEED_LITERALS.contains(&name.as_str()) {
                tables.insert(name);
            }
        }
    }
    tables.into_iter().collect()
}

/// `(name, type)` pairs from a columns-payload response. Rows without a
/// position-0 value (the real computer rows carry an integer id there, which
/// still stringifies) are kept verbatim; callers see exactly what the union
/// returned.
pub fn column_pairs(rows: &[SearchRow]) -> Vec<(String, String)> {
    rows.iter()
        .filter_map(|row| {
            let name = row.text(0)?;
            let data_type = row.text(1).unwrap_or_else(|| "unknown".into());
            Some((name, data_type))
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub max_length: Option<String>,
}

/// Column metadata from a definitions-payload response, preserving the
/// server-side `ordinal_position` ordering.
pub fn column_infos(rows: &[SearchRow]) -> Vec<ColumnInfo> {
    rows.iter()
        .filter_map(|row| {
            let name = row.text(0)?;
            Some(ColumnInfo {
                name,
                data_type: row.text(1).unwrap_or_else(|| "unknown".into()),
                max_length: row.text(2),
            })
        })
        .collect()
}

/// Renders a synthetic CREATE TABLE from extracted column metadata. Types
/// are uppercased; a parenthesized length is added when the catalog
/// reported one (the literal string "None" means it did not).
pub fn render_ddl(table: &str, columns: &[ColumnInfo]) -> String {
    let column_defs: Vec<String> = columns
        .iter()
        .map(|col| {
            let mut def = format!("    {} {}", col.name, col.data_type.to_uppercase());
            if let Some(len) = &col.max_length {
                if len != "None" {
                    def.push_str(&format!("({len})"));
                }
            }
            def
        })
        .collect();
    format!("CREATE TABLE {} (\n{}\n);", table, column_defs.join(",\n"))
}

/// Groups a full-schema-payload response into table -> ordered column list.
/// Per-table column order follows the response (the payload orders by
/// ordinal position); tables come out sorted.
pub fn group_schema(rows: &[SearchRow]) -> BTreeMap<String, Vec<(String, String)>> {
    let mut schema: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
    for row in rows {
        let Some(table) = row.text(0) else { continue };
        let entry = schema.entry(table).or_default();
        if let Some(column) = row.text(1) {
            entry.push((column, row.text(2).unwrap_or_else(|| "unknown".into())));
        }
    }
    schema
}
