use minic::compile;
use std::{env, fs, process};

/*
 * Command line compiler
 *
 * Usage from project root e.g. target/release/minic demos/point.mc
 */

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("usage: minic <filename>");
        return;
    }

    let filename = &args[1];
    let source = match fs::read_to_string(filename) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: {}", filename, err);
            process::exit(1);
        }
    };

    match compile(&source) {
        Ok(output) => {
            print!("{}", output);
        }
        Err(err) => {
            let (line, column) = err.loc(&source);
            eprintln!("{}:{}:{}: {}", filename, line, column, err);
            process::exit(1);
        }
    }
}
