use clap::Parser;
use context_key_matcher::context::ContextStore;
use context_key_matcher::ContextKeyService;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Simple runner: load context keys, then evaluate expressions against them.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Context expressions, e.g. "editorFocus && !readonly"
    #[arg(required = true)]
    expressions: Vec<String>,
    /// Facts as a JSON object (string). Applied before any --set.
    #[arg(long)]
    facts: Option<String>,
    /// Set one key, `key=<JSON>`; a value that is not JSON is taken as a string.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    sets: Vec<String>,
    /// Exit with status 2 if any expression is rejected (optional flag)
    #[arg(long)]
    strict: bool,
    /// Print the resulting context as JSON (optional flag)
    #[arg(long)]
    dump: bool,
    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    // Parse CLI arguments.
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    // Build the store.
    let store = match args.facts.as_deref() {
        Some(facts) => match ContextStore::from_json(facts) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Invalid facts: {e}");
                std::process::exit(1);
            }
        },
        None => ContextStore::new(),
    };
    let mut service = ContextKeyService::with_store(store);
    for set in &args.sets {
        let Some((key, raw)) = set.split_once('=') else {
            eprintln!("Invalid --set `{set}`: expected KEY=VALUE");
            std::process::exit(1);
        };
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        service.set_context(key.trim(), value);
    }

    // Evaluate.
    let mut rejected = false;
    for expr in &args.expressions {
        let out = service.match_or_report(expr).unwrap_or_else(|_| {
            rejected = true;
            false
        });
        println!("{expr} => {out}");
    }

    if args.dump {
        match serde_json::to_string_pretty(service.store()) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("Could not serialize context: {e}"),
        }
    }

    if args.strict && rejected {
        std::process::exit(2);
    }
}
