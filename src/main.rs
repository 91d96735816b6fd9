use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use cpu_time::ThreadTime;

use simplecart::classifiers::simple_cart::CartOptions;
use simplecart::classifiers::{Classifier, SimpleCart};
use simplecart::evaluation::{EvaluationSummary, evaluate_model};
use simplecart::loaders::ArffLoader;
use simplecart::ui::cli::args::{Cli, Command, DumpFormat, SchemaArgs, TrainArgs};
use simplecart::ui::cli::{logger, schema};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GREEN: &str = "\x1b[32m";
const FG_GREY: &str = "\x1b[90m";

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(logger::level_for(cli.verbose, cli.quiet)).context("failed to install logger")?;

    match cli.command {
        Command::Train(args) => run_train(args),
        Command::Schema(args) => run_schema(args),
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    let options = args.cart_options()?;
    let train = ArffLoader::load(&args.train, args.class_index)
        .with_context(|| format!("failed to load {}", args.train.display()))?;

    println!("{BOLD}{FG_CYAN}▶ CART Decision Tree{RESET}");
    println!(
        "{DIM}relation={}{RESET}  {DIM}instances={}{RESET}  {DIM}prune={} folds={} one_se={}{RESET}  {}",
        train.header().relation_name(),
        train.len(),
        options.prune,
        options.num_folds_pruning,
        options.use_one_se,
        timestamp_now()
    );
    println!(
        "{FG_GREY}────────────────────────────────────────────────────────────────────────{RESET}"
    );

    let start = ThreadTime::now();
    let mut cart = SimpleCart::new(options);
    cart.build_classifier(&train).context("training failed")?;
    let cpu_seconds = start.elapsed().as_secs_f64();

    println!("{cart}");
    println!();
    print_pruning_summary(&cart);

    let train_eval = evaluate_model(&cart, &train).context("failed to evaluate training set")?;
    let summary = EvaluationSummary::from_evaluator("train", &train_eval)
        .with_extra("error_rate", 1.0 - train_eval.accuracy())
        .with_extra("seconds", cpu_seconds);
    println!("{FG_GREEN}{BOLD}{summary}{RESET}");

    if let Some(path) = &args.test {
        let test = ArffLoader::load(path, Some(train.class_index()))
            .with_context(|| format!("failed to load {}", path.display()))?;
        train
            .header()
            .check_compatible(test.header())
            .context("test set does not match the training set")?;
        let test_eval = evaluate_model(&cart, &test).context("failed to evaluate test set")?;
        let summary = EvaluationSummary::from_evaluator("test", &test_eval)
            .with_extra("error_rate", 1.0 - test_eval.accuracy());
        println!("{FG_GREEN}{BOLD}{summary}{RESET}");
    }

    if let Some(path) = args.dump_model
        && !path.as_os_str().is_empty()
    {
        let contents = match args.dump_format {
            DumpFormat::Json => serde_json::to_string_pretty(&cart.model_dump()?)
                .context("failed to serialize model")?,
            DumpFormat::Text => cart.to_string(),
        };
        fs::write(&path, contents)
            .with_context(|| format!("failed to write model to {}", path.display()))?;
    }

    Ok(())
}

fn print_pruning_summary(cart: &SimpleCart) {
    let (Some(sequence), Some(selection)) = (cart.prune_sequence(), cart.cv_selection()) else {
        println!("{DIM}pruning disabled{RESET}");
        return;
    };

    println!(
        "{BOLD}{:>4}  {:>10}  {:>6}  {:>10}  {:>10}{RESET}",
        "step", "alpha", "leaves", "train_err", "cv_err"
    );
    for (index, entry) in sequence.entries().iter().enumerate() {
        let marker = if index == selection.chosen_index { " *" } else { "" };
        println!(
            "{:>4}  {:>10.4}  {:>6}  {:>10.3}  {:>10.3}{marker}",
            index, entry.alpha, entry.num_leaves, entry.training_errors, selection.errors[index]
        );
    }
    if let Some(se) = selection.standard_error {
        println!(
            "{DIM}min cv error {:.3} + 1 SE {:.3}{RESET}",
            selection.min_error, se
        );
    }
    println!();
}

fn run_schema(args: SchemaArgs) -> Result<()> {
    if args.table {
        let specs = schema::field_specs::<CartOptions>()?;
        print!("{}", schema::render_table(&specs));
    } else {
        let root = schema::schema_of::<CartOptions>();
        println!(
            "{}",
            serde_json::to_string_pretty(&root).context("failed to serialize schema")?
        );
    }
    Ok(())
}

fn timestamp_now() -> String {
    use chrono::{Local, SecondsFormat};
    let now = Local::now();
    format!(
        "{DIM}{}{}",
        now.to_rfc3339_opts(SecondsFormat::Secs, true),
        RESET
    )
}
