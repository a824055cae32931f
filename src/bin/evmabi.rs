use std::error::Error;
use std::fs;

use clap::{arg, Arg, ArgMatches, Command};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use evmabi::{abi_from_bytecode, AbiEntry};

fn main() -> Result<(), Box<dyn Error>> {
    let matches = Command::new("evmabi")
        .about("Recovers an approximate ABI from deployed EVM runtime bytecode")
        .version("0.1.0")
        .arg(arg!(--verbose "Show verbose output"))
        .arg(Arg::new("code").short('c').long("code").help("Treat <target> as a raw hex string rather than a file path"))
        .arg(Arg::new("target").required(true))
        .get_matches();

    if matches.is_present("verbose") {
        init_logging(LevelFilter::Trace);
    }

    let ok = recover(&matches)?;
    std::process::exit(if ok { 0 } else { 1 });
}

/// Recover and print the ABI for the bytecode named by `args`.
fn recover(args: &ArgMatches) -> Result<bool, Box<dyn Error>> {
    let target = args.get_one::<String>("target").unwrap();
    let hex = if args.contains_id("code") {
        target.clone()
    } else {
        fs::read_to_string(target)?.lines().collect::<String>()
    };

    let abi = abi_from_bytecode(&hex)?;
    if abi.is_empty() {
        println!("(no functions or events recovered)");
        return Ok(true);
    }
    for entry in &abi {
        print_entry(entry);
    }
    Ok(true)
}

fn print_entry(entry: &AbiEntry) {
    match entry {
        AbiEntry::Function(f) => {
            let inputs = if f.inputs.is_empty() { "" } else { "bytes" };
            let outputs = if f.outputs.is_empty() { "" } else { "bytes" };
            println!(
                "function {} ({inputs}) -> ({outputs}) [{}{}]",
                f.selector,
                f.state_mutability.as_str(),
                if f.payable { "" } else { ", guarded" }
            );
        }
        AbiEntry::Event(e) => {
            println!("event {}", e.hash);
        }
    }
}

/// Initialise logging using a suitable pattern.
pub fn init_logging(level: LevelFilter) {
    let encoder = PatternEncoder::new("[{l}] {m}{n}");
    let stdout = ConsoleAppender::builder().encoder(Box::new(encoder)).build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))
        .unwrap();
    let _handle = log4rs::init_config(config).unwrap();
}
