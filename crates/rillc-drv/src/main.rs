//! The `rillc` command line front-end.

use std::process::ExitCode;

use anyhow::Context;

use rillc_drv::{compile, report};
use rillc_util::Arena;

const EXIT_USAGE: u8 = 1;
const EXIT_IO: u8 = 2;
const EXIT_PARSE: u8 = 4;
const EXIT_SEMA: u8 = 5;

#[derive(Default)]
struct Options {
    print_tokens: bool,
    print_ast: bool,
    print_time: bool,
}

fn print_usage(prog: &str) {
    eprintln!("Usage: {prog} <file> [options]");
    eprintln!("Options:");
    eprintln!("  -t, --tokens    Print all tokens");
    eprintln!("  -a, --ast       Print the annotated AST");
    eprintln!("  -T, --time      Print phase timing and sizes");
    eprintln!("  -h, --help      Show this help");
    eprintln!("  -v, --version   Print version and exit");
}

fn print_version() {
    println!("rillc {}", env!("CARGO_PKG_VERSION"));
}

fn parse_options(args: &[String]) -> Option<(String, Options)> {
    let prog = args.first().map(String::as_str).unwrap_or("rillc");
    let Some(path) = args.get(1) else {
        print_usage(prog);
        return None;
    };
    if path == "--help" || path == "-h" {
        print_usage(prog);
        return None;
    }
    if path == "--version" || path == "-v" {
        print_version();
        return None;
    }

    let mut options = Options::default();
    for arg in &args[2..] {
        match arg.as_str() {
            "-t" | "--tokens" => options.print_tokens = true,
            "-a" | "--ast" => options.print_ast = true,
            "-T" | "--time" => options.print_time = true,
            "-h" | "--help" => {
                print_usage(prog);
                return None;
            }
            "-v" | "--version" => {
                print_version();
                return None;
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage(prog);
                return None;
            }
        }
    }
    Some((path.clone(), options))
}

fn read_source(path: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read '{path}'"))
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let Some((path, options)) = parse_options(&args) else {
        return ExitCode::from(EXIT_USAGE);
    };

    let source = match read_source(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(EXIT_IO);
        }
    };

    let arena = Arena::new();
    let compilation = compile(&arena, &source, &path);

    if options.print_tokens {
        print!("{}", report::render_tokens(&compilation));
    }
    if options.print_ast && compilation.program.is_some() {
        print!("{}", report::render_ast(&compilation));
    }

    for diag in compilation.diagnostics.iter() {
        eprintln!("{}", report::render_diagnostic(&compilation, diag));
    }

    if options.print_time {
        let stats = compilation.stats;
        println!(
            "lex   {:>9.3} ms  ({} tokens)",
            stats.lex_seconds * 1e3,
            stats.token_count
        );
        println!("parse {:>9.3} ms", stats.parse_seconds * 1e3);
        println!("sema  {:>9.3} ms", stats.sema_seconds * 1e3);
        println!(
            "source {} bytes, arena {} bytes",
            stats.source_bytes, stats.arena_bytes
        );
    }

    if compilation.program.is_none() {
        return ExitCode::from(EXIT_PARSE);
    }
    if compilation.diagnostics.has_errors() {
        return ExitCode::from(EXIT_SEMA);
    }
    ExitCode::SUCCESS
}
