use std::env;
use std::fs::File;
use std::io::{self, BufReader};

use ingest::{Accumulator, LogSource, MalformedLines, StartAt};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: ingest_cli <path|->");
        std::process::exit(2);
    }

    let path = &args[1];
    let mut source = LogSource::new(StartAt::default(), MalformedLines::Skip);
    if path == "-" {
        source.push_reader("<stdin>", Box::new(BufReader::new(io::stdin())));
    } else {
        let file = File::open(path).unwrap_or_else(|err| {
            eprintln!("failed to open {}: {}", path, err);
            std::process::exit(1);
        });
        source.push_reader(path.clone(), Box::new(BufReader::new(file)));
    }

    let accumulator = Accumulator::default();
    let mut records = source.by_ref().peekable();
    let window = accumulator
        .accumulate(&mut records, f64::INFINITY)
        .unwrap_or_else(|err| {
            eprintln!("failed to read {}: {}", path, err);
            std::process::exit(1);
        });
    drop(records);

    for issue in source.take_issues() {
        eprintln!(
            "skipped {}:{}: {}",
            issue.file_path,
            issue.line.unwrap_or(0),
            issue.message
        );
    }
    if window.records == 0 {
        eprintln!("no log records found");
        std::process::exit(3);
    }

    match serde_json::to_string_pretty(&window.aggregate) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            eprintln!("failed to serialize aggregate: {}", err);
            std::process::exit(1);
        }
    }
    if let Some(last) = window.last_timestamp {
        println!("records {}", window.records);
        println!("last_timestamp {}", last);
    }
}
