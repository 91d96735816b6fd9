use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use serde_json::{Map, Value};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::classifiers::simple_cart::CartOptions;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Train and inspect CART decision trees on ARFF data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Train a tree, print it and evaluate it
    Train(TrainArgs),
    /// Print the schema of the training options
    Schema(SchemaArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DumpFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Args)]
pub struct TrainArgs {
    /// ARFF file to train on
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub train: PathBuf,

    /// Optional ARFF file to evaluate the trained tree on
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub test: Option<PathBuf>,

    /// Zero-based index of the class attribute (default: last attribute)
    #[arg(long, value_name = "N")]
    pub class_index: Option<usize>,

    /// Override a training option (key=value, see `schema`)
    #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub options: Vec<KeyValue>,

    /// Write the trained model to this file
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub dump_model: Option<PathBuf>,

    /// Format of the model dump (json, text)
    #[arg(long, value_name = "FORMAT", default_value = "json", value_parser = parse_dump_format)]
    pub dump_format: DumpFormat,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Print a table of fields instead of the JSON schema
    #[arg(long)]
    pub table: bool,
}

#[derive(Clone, Debug)]
pub struct KeyValue {
    key: String,
    value: Value,
}

impl TrainArgs {
    /// Default options with every `--option` override applied.
    pub fn cart_options(&self) -> Result<CartOptions> {
        build_options(&self.options)
    }
}

fn build_options(overrides: &[KeyValue]) -> Result<CartOptions> {
    let mut params =
        serde_json::to_value(CartOptions::default()).context("failed to encode default options")?;
    for kv in overrides {
        let known = params
            .as_object()
            .is_some_and(|fields| fields.contains_key(root_key(&kv.key)));
        if !known {
            bail!("unknown option '{}'", kv.key);
        }
    }
    apply_overrides(&mut params, overrides)?;
    let options: CartOptions =
        serde_json::from_value(params).context("failed to decode training options")?;
    options.validate()?;
    Ok(options)
}

fn root_key(path: &str) -> &str {
    path.split('.').find(|s| !s.is_empty()).unwrap_or(path)
}

fn parse_dump_format(input: &str) -> Result<DumpFormat> {
    DumpFormat::from_str(input.trim()).map_err(|_| {
        let known: Vec<String> = DumpFormat::iter().map(|f| f.to_string()).collect();
        anyhow!("unknown format '{input}' (expected one of: {})", known.join(", "))
    })
}

fn apply_overrides(target: &mut Value, overrides: &[KeyValue]) -> Result<()> {
    for kv in overrides {
        set_path(target, &kv.key, kv.value.clone())
            .with_context(|| format!("failed to set '{}'", kv.key))?;
    }
    Ok(())
}

fn set_path(target: &mut Value, path: &str, new_value: Value) -> Result<()> {
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        bail!("empty key is not allowed");
    };

    let mut current = target;
    for seg in parents {
        current = ensure_object(current)?
            .entry((*seg).to_string())
            .or_insert(Value::Null);
    }

    ensure_object(current)?.insert((*last).to_string(), new_value);
    Ok(())
}

fn ensure_object(value: &mut Value) -> Result<&mut Map<String, Value>> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("cannot set nested field on non-object value: {other:?}"),
    }
}

fn parse_key_value(raw: &str) -> Result<KeyValue, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| "expected KEY=VALUE".to_string())?;
    let key = key.trim();
    if key.is_empty() {
        return Err("key cannot be empty".to_string());
    }

    let value = value.trim();
    let parsed = parse_literal(value);

    Ok(KeyValue {
        key: key.to_string(),
        value: parsed,
    })
}

fn parse_literal(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kv(raw: &str) -> KeyValue {
        parse_key_value(raw).unwrap()
    }

    #[test]
    fn parse_key_value_reads_json_literals() {
        assert_eq!(kv("min_num_obj=1.5").value, json!(1.5));
        assert_eq!(kv("prune = false").value, json!(false));
        assert_eq!(kv("name=abc").value, json!("abc"));
        assert_eq!(kv("name=").value, json!(""));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=1").is_err());
    }

    #[test]
    fn overrides_are_applied_to_defaults() {
        let options = build_options(&[kv("min_num_obj=1"), kv("use_one_se=true"), kv("seed=7")])
            .unwrap();
        assert_eq!(options.min_num_obj, 1.0);
        assert!(options.use_one_se);
        assert_eq!(options.seed, 7);
        assert_eq!(options.num_folds_pruning, 5);
    }

    #[test]
    fn unknown_or_invalid_options_are_rejected() {
        assert!(build_options(&[kv("min_obj=1")]).is_err());
        assert!(build_options(&[kv("prune=maybe")]).is_err());
        assert!(build_options(&[kv("size_per=2")]).is_err());
    }

    #[test]
    fn set_path_creates_nested_objects() {
        let mut target = json!({});
        set_path(&mut target, "a.b", json!(3)).unwrap();
        assert_eq!(target, json!({ "a": { "b": 3 } }));

        let mut scalar = json!({ "a": 1 });
        assert!(set_path(&mut scalar, "a.b", json!(3)).is_err());
        assert!(set_path(&mut scalar, "..", json!(3)).is_err());
    }

    #[test]
    fn dump_format_parses_case_insensitively() {
        assert_eq!(parse_dump_format("JSON").unwrap(), DumpFormat::Json);
        assert_eq!(parse_dump_format(" text ").unwrap(), DumpFormat::Text);
        let err = parse_dump_format("csv").unwrap_err().to_string();
        assert!(err.contains("json, text"));
    }

    #[test]
    fn cli_parses_train_command() {
        let cli = Cli::try_parse_from([
            "simplecart",
            "train",
            "--train",
            "data.arff",
            "--option",
            "prune=false",
            "--dump-format",
            "text",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Command::Train(args) = cli.command else {
            panic!("expected train command");
        };
        assert_eq!(args.train, PathBuf::from("data.arff"));
        assert_eq!(args.dump_format, DumpFormat::Text);
        assert!(!args.cart_options().unwrap().prune);
    }
}
