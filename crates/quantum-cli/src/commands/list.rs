//! Generic list command

use std::fmt;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use clap::{Args, ValueEnum};
use quantum_client::{Record, ResourceApi, ResourceKind};
use quantum_core::query::QueryParams;
use tracing::debug;

use super::{CommandOutput, Formatter};
use crate::output::format_value;
use crate::specs::{parse_args_to_dict, to_query};

/// Options shared by every list command.
///
/// Filters follow the known options, e.g. `net-list -F id --name=test4`.
/// Known options that land among the filters are picked back out by
/// [`ListArgs::absorb_known_options`].
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ListArgs {
    /// Show detailed information
    #[arg(short = 'D', long)]
    pub show_details: bool,

    /// Field to return from the server, can be repeated
    #[arg(short = 'F', long = "field", value_name = "FIELD")]
    pub fields: Vec<String>,

    /// Number of records to request per page
    #[arg(short = 'P', long, value_name = "SIZE")]
    pub page_size: Option<u32>,

    /// Attribute to sort by, can be repeated
    #[arg(long, value_name = "SORT_KEY")]
    pub sort_key: Vec<String>,

    /// Sort direction, paired with --sort-key
    #[arg(long, value_enum, value_name = "SORT_DIR")]
    pub sort_dir: Vec<SortDir>,

    /// Filters as --key=value or --key value
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "FILTERS"
    )]
    pub values_specs: Vec<String>,
}

impl ListArgs {
    /// Move known options found among the filters into their fields.
    ///
    /// Everything after the first filter is captured verbatim, so
    /// `--name=x -F id` arrives here with `-F id` still in `values_specs`.
    pub fn absorb_known_options(&mut self) -> Result<()> {
        let mut specs = std::mem::take(&mut self.values_specs).into_iter();
        let mut rest = Vec::new();
        while let Some(token) = specs.next() {
            let (flag, inline) = match token.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (token.clone(), None),
            };
            match flag.as_str() {
                "-D" | "--show-details" if inline.is_none() => self.show_details = true,
                "-F" | "--field" => self.fields.push(option_value(&flag, inline, &mut specs)?),
                "-P" | "--page-size" => {
                    let value = option_value(&flag, inline, &mut specs)?;
                    let size = value
                        .parse()
                        .map_err(|_| anyhow!("argument {flag}: invalid int value: '{value}'"))?;
                    self.page_size = Some(size);
                }
                "--sort-key" => self.sort_key.push(option_value(&flag, inline, &mut specs)?),
                "--sort-dir" => {
                    let value = option_value(&flag, inline, &mut specs)?;
                    let dir = <SortDir as ValueEnum>::from_str(&value, true)
                        .map_err(|err| anyhow!("argument {flag}: {err}"))?;
                    self.sort_dir.push(dir);
                }
                _ => rest.push(token),
            }
        }
        self.values_specs = rest;
        Ok(())
    }
}

fn option_value(
    flag: &str,
    inline: Option<String>,
    specs: &mut impl Iterator<Item = String>,
) -> Result<String> {
    match inline {
        Some(value) => Ok(value),
        None => specs
            .next()
            .ok_or_else(|| anyhow!("argument {flag}: expected one argument")),
    }
}

/// Sort direction.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// A resource listing.
#[async_trait]
pub trait ListCommand: Send + Sync {
    /// Resource being listed.
    fn resource(&self) -> ResourceKind;

    fn args(&self) -> &ListArgs;

    fn args_mut(&mut self) -> &mut ListArgs;

    /// Default columns when neither `-F` nor `-D` is given.
    fn list_columns(&self) -> &'static [&'static str] {
        &[]
    }

    /// Custom renderer for a column.
    fn formatter(&self, _column: &str) -> Option<Formatter> {
        None
    }

    /// Fetch the records.
    async fn retrieve_list(&mut self, api: &dyn ResourceApi) -> Result<Vec<Record>> {
        retrieve(self.resource(), api, self.args()).await
    }

    /// Post-process fetched records before rendering.
    async fn extend_list(&self, _api: &dyn ResourceApi, _data: &mut [Record]) -> Result<()> {
        Ok(())
    }
}

/// Build the list query from the filters and known options.
pub fn build_query(args: &ListArgs) -> Result<QueryParams> {
    let mut query = to_query(&parse_args_to_dict(&args.values_specs)?);
    query.push_all("fields", &args.fields);
    if args.show_details {
        query.push("verbose", "True");
    }
    query.push_opt("limit", args.page_size);
    query.push_all("sort_key", &args.sort_key);
    query.push_all("sort_dir", &args.sort_dir);
    Ok(query)
}

/// Generic retrieval: one list call with the built query.
pub async fn retrieve(
    kind: ResourceKind,
    api: &dyn ResourceApi,
    args: &ListArgs,
) -> Result<Vec<Record>> {
    let query = build_query(args)?;
    debug!(resource = %kind, params = query.as_pairs().len(), "listing");
    Ok(api.list(kind, &query).await?)
}

/// Pick the columns to display.
///
/// Requested `-F` fields that exist win, in the order given. Without them
/// the command's default columns apply unless `-D` was given; otherwise
/// every key of the first record is shown, sorted.
pub fn setup_columns(first: Option<&Record>, args: &ListArgs, defaults: &[&str]) -> Vec<String> {
    let Some(first) = first else {
        return Vec::new();
    };

    if !args.fields.is_empty() {
        return args
            .fields
            .iter()
            .filter(|field| first.contains_key(field.as_str()))
            .cloned()
            .collect();
    }
    if !args.show_details && !defaults.is_empty() {
        return defaults
            .iter()
            .filter(|column| first.contains_key(**column))
            .map(|column| column.to_string())
            .collect();
    }
    let mut columns: Vec<String> = first.keys().cloned().collect();
    columns.sort();
    columns
}

/// Retrieve, extend and tabulate.
pub async fn run<C: ListCommand + ?Sized>(
    cmd: &mut C,
    api: &dyn ResourceApi,
) -> Result<CommandOutput> {
    cmd.args_mut().absorb_known_options()?;
    let mut data = cmd.retrieve_list(api).await?;
    cmd.extend_list(api, &mut data).await?;

    let columns = setup_columns(data.first(), cmd.args(), cmd.list_columns());
    let rows = data
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| match cmd.formatter(column) {
                    Some(format) => format(record),
                    None => record.get(column).map(format_value).unwrap_or_default(),
                })
                .collect()
        })
        .collect();

    Ok(CommandOutput::Listing {
        columns,
        rows,
        records: data,
    })
}
