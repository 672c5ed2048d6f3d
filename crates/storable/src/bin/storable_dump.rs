//! Dump a Storable file as JSON.

use std::process::ExitCode;

fn main() -> ExitCode {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: storable-dump <file>");
        return ExitCode::from(2);
    };
    match run(&path) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("storable-dump: {path}: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let data = std::fs::read(path)?;
    let value = storable::thaw(&data)?;
    let json = storable::to_json(&value);
    Ok(serde_json::to_string_pretty(&json)?)
}
