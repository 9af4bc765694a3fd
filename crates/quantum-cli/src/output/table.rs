//! Table output formatting

use comfy_table::{presets::NOTHING, Table};
use quantum_client::Record;

use super::format_value;

/// Create a new table with headers
pub fn create_table<T: AsRef<str>>(headers: &[T]) -> Table {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(headers.iter().map(AsRef::as_ref));
    table
}

/// Two-column Field/Value table for a single record, fields sorted.
pub fn record_table(record: &Record) -> Table {
    let mut table = create_table(&["Field", "Value"]);
    let mut fields: Vec<&String> = record.keys().collect();
    fields.sort();
    for field in fields {
        table.add_row(vec![field.clone(), format_value(&record[field])]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_table_sorts_fields() {
        let record = json!({"name": "net1", "id": "n1", "shared": false});
        let Some(record) = record.as_object() else {
            panic!("object expected");
        };
        let rendered = record_table(record).to_string();
        let id = rendered.find("n1").unwrap();
        let name = rendered.find("net1").unwrap();
        assert!(id < name);
        assert!(rendered.contains("False"));
        assert!(rendered.contains("Field"));
    }
}
