use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use lambda::builtin::stdout_environment;

const HELP_MSG: &str = r#"Usage: lambda [FILE] [--help|-h]

  FILE  Program to evaluate; read from stdin when omitted

Options:
  -h, --help  Print this message

Set RUST_LOG (e.g. RUST_LOG=lambda=debug) to log to stderr."#;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|x| x == "--help" || x == "-h") {
        println!("{}", HELP_MSG);
        return;
    }

    lambda::init_tracing();

    let source = match args.get(0) {
        Some(filename) => fs::read_to_string(filename),
        None => {
            let mut input_buffer = String::new();
            io::stdin().read_to_string(&mut input_buffer)
                .map(|_| input_buffer)
        },
    };
    let source = source.unwrap_or_else(|err| {
        eprintln!("error reading program: {}", err);
        process::exit(1);
    });

    if let Err(err) = lambda::run(&source, &stdout_environment()) {
        eprintln!("{}", err);
        process::exit(1);
    }
}
