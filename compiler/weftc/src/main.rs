//! Weft CLI
//!
//! Inspect how the incremental structure sees a file.

use weftc::{init_tracing, parse_script, report, Document, WeftConfig};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "tokens" => {
            if args.len() != 3 && args.len() != 5 {
                eprintln!("Usage: weft tokens <file> [pos len]");
                std::process::exit(1);
            }
            let mut doc = open(&args[2]);
            let (pos, len) = if args.len() == 5 {
                (offset(&args[3], "pos"), offset(&args[4], "len"))
            } else {
                (0, doc.text().len())
            };
            print!("{}", report::tokens(&mut doc, pos, len));
        }
        "tree" => {
            if args.len() < 3 {
                eprintln!("Usage: weft tree <file>");
                std::process::exit(1);
            }
            let doc = open(&args[2]);
            print!("{}", report::tree(&doc));
        }
        "complete" => {
            if args.len() < 4 {
                eprintln!("Usage: weft complete <file> <pos>");
                std::process::exit(1);
            }
            let mut doc = open(&args[2]);
            let pos = offset(&args[3], "pos");
            print!("{}", report::complete(&mut doc, pos));
        }
        "replay" => {
            if args.len() < 4 {
                eprintln!("Usage: weft replay <file> <script>");
                eprintln!();
                eprintln!("Each script line is `pos removed text`; `#` starts a comment.");
                std::process::exit(1);
            }
            let mut doc = open(&args[2]);
            let edits = match parse_script(&read_file(&args[3])) {
                Ok(edits) => edits,
                Err(e) => {
                    eprintln!("error: {}: {e}", args[3]);
                    std::process::exit(1);
                }
            };
            match report::replay(&mut doc, &edits) {
                Ok(summary) => print!("{summary}"),
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("Weft {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn open(path: &str) -> Document {
    let config = match WeftConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    Document::new(read_file(path), config)
}

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

fn offset(arg: &str, what: &str) -> usize {
    if let Ok(n) = arg.parse() {
        return n;
    }
    eprintln!("error: {what} must be a byte offset, got '{arg}'");
    std::process::exit(1);
}

fn print_usage() {
    println!("Weft (incremental document structure)");
    println!();
    println!("Usage: weft <command> [options]");
    println!();
    println!("Commands:");
    println!("  tokens <file> [pos len]   Print highlight runs");
    println!("  tree <file>               Print the node outline");
    println!("  complete <file> <pos>     List completion candidates at a byte offset");
    println!("  replay <file> <script>    Apply an edit script and report reuse");
    println!("  help                      Show this help message");
    println!("  version                   Show version information");
    println!();
    println!("Environment:");
    println!("  WEFT_REPARSE_CHUNK        Bytes parsed per reparse step (default 8000)");
    println!("  WEFT_EAGER_REPARSE        Reparse after every edit (default on)");
    println!("  RUST_LOG                  Tracing filter, e.g. weft_parse=debug");
    println!("  WEFT_LOG_TREE             Nest tracing output by span");
    println!();
    println!("Examples:");
    println!("  weft tree Main.java");
    println!("  weft tokens Main.java 120 40");
    println!("  weft complete Main.java 512");
    println!("  weft replay Main.java typing.edits");
}
