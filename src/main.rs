use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use env_logger::Env;
use itertools::Itertools;
use log::info;
use serde_json::Value;

use ranked_search::highlight;
use ranked_search::{
    load_records, search, FieldConfig, FieldSpec, JsonFile, MatchResult, Provider, SearchOptions,
};

/// Rank JSON records against a query.
#[derive(Debug, Parser)]
#[command(name = "ranked-search", version)]
struct Args {
    /// Text to search for. An empty query lists every record.
    #[arg(default_value = "")]
    query: String,

    /// JSON files with records, either an array or an object with an `items` array.
    #[arg(short, long = "records", required = true, num_args = 1..)]
    records: Vec<PathBuf>,

    /// Field to search as `name` or `name:weight`. Dotted names reach nested values,
    /// a suffix after the last `:` that is not a number stays part of the name.
    #[arg(short, long = "key", value_parser = parse_key)]
    keys: Vec<FieldConfig>,

    /// JSON file with an array of `{"name", "weight", "path"}` field entries.
    #[arg(long)]
    fields: Option<PathBuf>,

    /// Match the query as a subsequence instead of a literal substring.
    #[arg(long)]
    fuzzy: bool,

    /// Print at most this many results.
    #[arg(short, long)]
    limit: Option<usize>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Increase log verbosity, repeat for more.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// One line per matching field with highlights in brackets.
    Text,
    Json,
}

fn parse_key(value: &str) -> Result<FieldConfig> {
    let (name, weight) = value
        .rsplit_once(':')
        .and_then(|(name, weight)| Some((name, weight.parse::<f64>().ok()?)))
        .unwrap_or((value, 1.0));

    if name.is_empty() {
        bail!("missing field name in {value:?}");
    }

    Ok(FieldConfig::new(name, weight))
}

fn load_field_configs(args: &Args) -> Result<Vec<FieldConfig>> {
    let mut configs = args.keys.clone();

    if let Some(path) = &args.fields {
        let reader = BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        );
        let from_file: Vec<FieldConfig> = serde_json::from_reader(reader)
            .with_context(|| format!("failed to parse fields from {}", path.display()))?;
        configs.extend(from_file);
    }

    if configs.is_empty() {
        bail!("no fields to search, pass --key or --fields");
    }

    Ok(configs)
}

fn print_text(
    out: &mut impl Write,
    results: &[MatchResult<'_, Value>],
    fields: &[FieldSpec<Value>],
) -> Result<()> {
    for (idx, result) in results.iter().enumerate() {
        writeln!(out, "{}.", idx + 1)?;

        for field in fields {
            let text = field.text(result.record);
            if text.is_empty() {
                continue;
            }

            let rendered = highlight::render(&text, result.ranges(field.name()), "[", "]");
            writeln!(out, "    {}: {}", field.name(), rendered)?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let fields = load_field_configs(&args)?
        .into_iter()
        .map(FieldSpec::from)
        .collect_vec();

    let providers = args
        .records
        .iter()
        .map(|path| Arc::new(JsonFile::new(path)) as Arc<dyn Provider>)
        .collect_vec();

    let records = load_records(&providers)?;
    info!("loaded {} records from {} file(s)", records.len(), providers.len());

    let options = SearchOptions {
        fields,
        fuzzy: args.fuzzy,
    };

    let mut results = search(&args.query, &records, &options)?;
    if let Some(limit) = args.limit {
        results.truncate(limit);
    }

    let mut out = BufWriter::new(io::stdout().lock());
    match args.format {
        Format::Text => print_text(&mut out, &results, &options.fields)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut out, &results)?;
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}
