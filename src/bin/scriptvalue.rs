use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use scriptvalue::{PrecompileOpts, ScriptValue};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scriptvalue", version)]
struct Cli {
    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    /// Log pass details to stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse legacy expression text into a script value.
    Parse(ParseArgs),
    /// Constant-fold a script value.
    Optimise(InputArgs),
    /// List variables referenced by a script value, in traversal order.
    Vars(InputArgs),
    /// Lower a script value into fetches plus a postfix stack program.
    Precompile(PrecompileArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input script value JSON.
    #[arg(long = "in", conflicts_with = "expr", required_unless_present = "expr")]
    in_path: Option<PathBuf>,

    /// Legacy expression text, used as an `expression` node.
    #[arg(long)]
    expr: Option<String>,
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// Legacy expression text.
    expr: String,

    /// Fail on syntax errors instead of degrading to 0.
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct PrecompileArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Prefix for generated fetch locals.
    #[arg(long, default_value = "local_")]
    local_prefix: String,

    /// Group fetches reading the same thing together.
    #[arg(long)]
    sort_fetches: bool,

    /// Precompile the input as-is, without constant folding first.
    #[arg(long)]
    no_optimise: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let out = match cli.cmd {
        Command::Parse(args) => cmd_parse(args)?,
        Command::Optimise(args) => {
            let value = read_input(&args)?;
            serde_json::to_value(scriptvalue::optimise_script_value(&value))?
        }
        Command::Vars(args) => {
            let value = read_input(&args)?;
            serde_json::to_value(scriptvalue::extract_script_value_variables(&value))?
        }
        Command::Precompile(args) => cmd_precompile(args)?,
    };
    let s = if cli.pretty {
        serde_json::to_string_pretty(&out)?
    } else {
        serde_json::to_string(&out)?
    };
    println!("{s}");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_value_json(path: &Path) -> anyhow::Result<ScriptValue> {
    let f = File::open(path).with_context(|| format!("open script value '{}'", path.display()))?;
    let r = BufReader::new(f);
    let value: ScriptValue =
        serde_json::from_reader(r).with_context(|| "parse script value JSON")?;
    Ok(value)
}

fn read_input(args: &InputArgs) -> anyhow::Result<ScriptValue> {
    match (&args.in_path, &args.expr) {
        (Some(path), _) => read_value_json(path),
        (None, Some(expr)) => Ok(ScriptValue::expression(expr.as_str())),
        (None, None) => anyhow::bail!("either --in or --expr is required"),
    }
}

fn cmd_parse(args: ParseArgs) -> anyhow::Result<serde_json::Value> {
    let value = if args.strict {
        scriptvalue::try_parse_expression(&args.expr)
            .with_context(|| format!("parse expression '{}'", args.expr))?
    } else {
        scriptvalue::parse_expression(&args.expr)
    };
    Ok(serde_json::to_value(value)?)
}

fn cmd_precompile(args: PrecompileArgs) -> anyhow::Result<serde_json::Value> {
    let mut value = read_input(&args.input)?;
    if !args.no_optimise {
        value = scriptvalue::optimise_script_value(&value);
    }
    let opts = PrecompileOpts::default().with_local_prefix(args.local_prefix);
    let mut program = scriptvalue::precompile_script_value_with(&value, &opts);
    if args.sort_fetches {
        program.fetches = scriptvalue::sort_fetch_operations(program.fetches);
    }
    for fetch in &program.fetches {
        tracing::debug!(local = %fetch.local, target = fetch.value.target(), "fetch");
    }
    Ok(serde_json::to_value(program)?)
}
