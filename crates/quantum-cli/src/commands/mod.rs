//! Command framework and the network commands built on it
//!
//! Each verb module holds a trait that a resource command implements, the
//! shared clap arguments of that verb and a `run` function carrying the
//! generic behaviour. Resource commands override trait hooks and may call
//! back into the generic functions.

pub mod create;
pub mod delete;
pub mod list;
pub mod network;
pub mod show;
pub mod update;

use anyhow::Result;
use quantum_client::Record;

use crate::output::json::to_json;
use crate::output::table::{create_table, record_table};
use crate::output::OutputFormat;

pub use network::NetworkCommand;

/// Renders the cell of one column from a whole record.
pub type Formatter = fn(&Record) -> String;

/// What a command produced, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Rows of a list command, already formatted per column.
    Listing {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
        records: Vec<Record>,
    },
    /// A single resource, optionally preceded by a heading line.
    Record {
        heading: Option<String>,
        record: Record,
    },
    /// A confirmation line.
    Message(String),
}

impl CommandOutput {
    /// Render the output in the requested format.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match (self, format) {
            (Self::Listing { records, .. }, OutputFormat::Json) => to_json(records),
            (Self::Listing { columns, rows, .. }, OutputFormat::Table) => {
                let mut table = create_table(columns);
                for row in rows {
                    table.add_row(row.clone());
                }
                Ok(table.to_string())
            }
            (Self::Record { record, .. }, OutputFormat::Json) => to_json(record),
            (Self::Record { heading, record }, OutputFormat::Table) => {
                let table = record_table(record).to_string();
                Ok(match heading {
                    Some(heading) => format!("{heading}\n{table}"),
                    None => table,
                })
            }
            (Self::Message(message), _) => Ok(message.clone()),
        }
    }

    /// Print the output to stdout.
    pub fn print(&self, format: OutputFormat) -> Result<()> {
        println!("{}", self.render(format)?);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use mockall::mock;
    use quantum_client::{Record, ResourceApi, ResourceKind};
    use quantum_core::query::QueryParams;
    use serde_json::Value;

    mock! {
        pub Api {}

        #[async_trait]
        impl ResourceApi for Api {
            async fn list(&self, kind: ResourceKind, query: &QueryParams) -> quantum_core::Result<Vec<Record>>;
            async fn show(&self, kind: ResourceKind, id: &str, query: &QueryParams) -> quantum_core::Result<Record>;
            async fn create(&self, kind: ResourceKind, body: &Value) -> quantum_core::Result<Record>;
            async fn update(&self, kind: ResourceKind, id: &str, body: &Value) -> quantum_core::Result<Record>;
            async fn delete(&self, kind: ResourceKind, id: &str) -> quantum_core::Result<()>;
        }
    }

    /// Build a record from a JSON object literal.
    pub fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    /// Value of the first pair with `key`.
    pub fn query_value<'a>(query: &'a QueryParams, key: &str) -> Option<&'a str> {
        query
            .as_pairs()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
