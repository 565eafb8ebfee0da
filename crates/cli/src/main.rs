mod report;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use getarg::{ArgumentTable, read_conf_file};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

/// Inserted as element 0 so the table sees a normal argv.
const PROGRAM_NAME: &str = "getarg";

#[derive(Parser)]
#[command(name = "getarg")]
#[command(version, about = "Show how getarg resolves a command line", long_about = None)]
struct Cli {
    /// Config file merged under the command-line tokens
    #[arg(long, global = true, value_name = "FILE")]
    conf: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a boolean flag (honours -noNAME)
    Bool(BoolArgs),

    /// Resolve a string flag
    String(StringArgs),

    /// Resolve an integer flag
    Int(IntArgs),

    /// Print every occurrence of a flag, one per line
    All(AllArgs),

    /// Print the whole table
    Dump(DumpArgs),
}

#[derive(Args)]
struct TokenArgs {
    /// Tokens to parse, as they would follow a program name
    #[arg(last = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

#[derive(Parser)]
struct BoolArgs {
    /// Flag name (-name, --name or name)
    #[arg(value_name = "NAME", allow_hyphen_values = true)]
    name: String,

    /// Value when neither NAME nor its negation is present
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    default: bool,

    #[command(flatten)]
    input: TokenArgs,
}

#[derive(Parser)]
struct StringArgs {
    /// Flag name (-name, --name or name)
    #[arg(value_name = "NAME", allow_hyphen_values = true)]
    name: String,

    /// Value when NAME is absent
    #[arg(long, allow_hyphen_values = true)]
    default: Option<String>,

    #[command(flatten)]
    input: TokenArgs,
}

#[derive(Parser)]
struct IntArgs {
    /// Flag name (-name, --name or name)
    #[arg(value_name = "NAME", allow_hyphen_values = true)]
    name: String,

    /// Value when NAME is absent
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    default: i64,

    #[command(flatten)]
    input: TokenArgs,
}

#[derive(Parser)]
struct AllArgs {
    /// Flag name (-name, --name or name)
    #[arg(value_name = "NAME", allow_hyphen_values = true)]
    name: String,

    #[command(flatten)]
    input: TokenArgs,
}

#[derive(Parser)]
struct DumpArgs {
    /// Emit JSON instead of one entry per line
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    input: TokenArgs,
}

fn main() -> Result<()> {
    // A missing .env is the common case.
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();
    let conf = cli.conf.as_deref();

    match cli.command {
        Commands::Bool(args) => {
            let table = load_table(&args.input.tokens, conf)?;
            println!("{}", table.get_bool(&args.name, args.default));
        }
        Commands::String(args) => {
            let table = load_table(&args.input.tokens, conf)?;
            let default = args.default.as_deref().unwrap_or("");
            println!("{}", table.get_string(&args.name, default));
        }
        Commands::Int(args) => {
            let table = load_table(&args.input.tokens, conf)?;
            println!("{}", table.get_int(&args.name, args.default));
        }
        Commands::All(args) => {
            let table = load_table(&args.input.tokens, conf)?;
            for value in table.get_all(&args.name) {
                println!("{}", value.as_deref().unwrap_or(""));
            }
        }
        Commands::Dump(args) => {
            let table = load_table(&args.input.tokens, conf)?;
            let out = if args.json {
                report::render_json(&table)?
            } else {
                report::render_text(&table)
            };
            print!("{out}");
        }
    }

    Ok(())
}

enum ConfSource {
    /// `--conf FILE`; must be readable.
    Explicit(PathBuf),
    /// `-conf=FILE` among the tokens; skipped with a warning if unreadable.
    Token(PathBuf),
}

fn load_table(tokens: &[String], conf: Option<&Path>) -> Result<ArgumentTable> {
    let argv = std::iter::once(PROGRAM_NAME).chain(tokens.iter().map(String::as_str));
    let builder = ArgumentTable::builder().tokens(argv);

    let source = match conf {
        Some(path) => ConfSource::Explicit(path.to_path_buf()),
        None => {
            let path = builder.peek().get_string("-conf", "");
            if path.is_empty() {
                return Ok(builder.build());
            }
            ConfSource::Token(PathBuf::from(path))
        }
    };

    let entries = match source {
        ConfSource::Explicit(path) => read_conf_file(&path)
            .with_context(|| format!("failed to load --conf {}", path.display()))?,
        ConfSource::Token(path) => match read_conf_file(&path) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!("ignoring -conf: {err:#}");
                Vec::new()
            }
        },
    };

    Ok(builder.config_entries(entries).build())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
