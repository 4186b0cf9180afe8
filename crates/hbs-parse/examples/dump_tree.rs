use std::io::Read;

use hbs_parse::{Parser, Tokenizer};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut source = String::new();
    std::io::stdin().read_to_string(&mut source)?;

    println!("=== Symbols ===");
    for symbol in Tokenizer::new(&source) {
        println!("{:?}", symbol);
    }

    let parse = Parser::new(&source).parse()?;

    println!("\n=== Tree ===");
    println!("{}", parse.root);

    if !parse.is_ok() {
        println!("\n=== Diagnostics ===");
        eprint!("{}", parse.render_diagnostics("<stdin>", &source));
    }
    Ok(())
}
