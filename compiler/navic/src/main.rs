//! Navi CLI
//!
//! Self-check definition files and evaluate type expressions against the
//! global scope.

use navic::commands::{
    check_file, eval_expression_with_file, prelude_report, resolve_config, CommandError,
    MAX_DEPTH_ENV,
};

fn main() {
    navic::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let env_depth = std::env::var(MAX_DEPTH_ENV).ok();

    let result = match args[1].as_str() {
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: navi check <file.navi> [--max-depth=<n>]");
                std::process::exit(1);
            }
            let options = Options::parse(&args[3..]);
            resolve_config(options.max_depth, env_depth.as_deref())
                .and_then(|config| check_file(&args[2], config))
                .and_then(navic::commands::CheckReport::into_result)
        }
        "eval" => {
            if args.len() < 3 {
                eprintln!("Usage: navi eval <expr> [--defs=<file>] [--max-depth=<n>]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --defs=<file>      Definitions layered on the prelude");
                eprintln!("  --max-depth=<n>    Evaluation depth limit (default: 128,");
                eprintln!("                     or ${MAX_DEPTH_ENV})");
                std::process::exit(1);
            }
            let options = Options::parse(&args[3..]);
            resolve_config(options.max_depth, env_depth.as_deref())
                .and_then(|config| eval_expression_with_file(&args[2], options.defs, config))
        }
        "prelude" => {
            let options = Options::parse(&args[2..]);
            resolve_config(options.max_depth, env_depth.as_deref()).and_then(prelude_report)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    finish(result);
}

/// Flags shared by the commands.
#[derive(Default)]
struct Options<'a> {
    defs: Option<&'a str>,
    max_depth: Option<&'a str>,
}

impl<'a> Options<'a> {
    fn parse(args: &'a [String]) -> Self {
        let mut options = Options::default();
        for arg in args {
            if let Some(path) = arg.strip_prefix("--defs=") {
                options.defs = Some(path);
            } else if let Some(depth) = arg.strip_prefix("--max-depth=") {
                options.max_depth = Some(depth);
            } else {
                eprintln!("warning: ignoring unknown argument `{arg}`");
            }
        }
        options
    }
}

fn finish(result: Result<String, CommandError>) {
    match result {
        Ok(output) => {
            let output = output.trim_end();
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Err(error) => {
            eprintln!("{}", error.render());
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Navi type language");
    println!();
    println!("Usage: navi <command> [options]");
    println!();
    println!("Commands:");
    println!("  check <file.navi>    Self-check definitions layered on the prelude");
    println!("  eval <expr>          Evaluate a type expression");
    println!("  prelude              List and self-check the global scope");
    println!("  help                 Show this message");
    println!();
    println!("Options:");
    println!("  --defs=<file>        (eval) definitions to layer on the prelude");
    println!("  --max-depth=<n>      Evaluation depth limit (default: 128)");
    println!();
    println!("Environment:");
    println!("  {MAX_DEPTH_ENV}       Default for --max-depth");
    println!("  RUST_LOG             Enable tracing output (e.g. RUST_LOG=navi_eval=debug)");
}
