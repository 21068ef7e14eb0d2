//! Flatten a persisted run trace into a CSV table for model training.

use anyhow::Context;
use evacopt::data::{read_training_data, CsvConnector};
use evacopt::error::EvacError;
use evacopt::services::ConverterArgs;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("json-to-csv");

    let cli = match ConverterArgs::parse(args.get(1..).unwrap_or_default()) {
        Ok(cli) => cli,
        Err(EvacError::Usage(_)) => {
            println!("{}", ConverterArgs::usage(program));
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let input = cli.input_path();
    let output = cli.output_path();

    let trace = read_training_data(&input)
        .with_context(|| format!("Failed to read trace {}", input.display()))?;
    let mut table = CsvConnector::trace_to_frame(&trace)?;
    CsvConnector::write(&mut table, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    log::info!(
        "Wrote {} rows from {} runs to {}",
        table.height(),
        trace.len(),
        output.display()
    );
    Ok(())
}
