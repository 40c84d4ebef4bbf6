use clap::Parser;
use sdr_harvest::config::args::ExportArgs;
use sdr_harvest::core::export::{company_rows, read_report, write_csv};
use sdr_harvest::utils::error::{exit_with, Result};
use sdr_harvest::utils::logger;
use std::fs::File;
use std::io::BufWriter;

fn run(args: &ExportArgs) -> Result<()> {
    let report = read_report(&args.input)?;
    let rows = company_rows(&report, args.sdr_only);
    let output = args.output_path();

    let file = File::create(&output)?;
    write_csv(&rows, args.sdr_only, BufWriter::new(file))?;

    tracing::info!("Wrote {} rows to {}", rows.len(), output);
    println!("Successfully converted {} to {}", args.input, output);
    if args.sdr_only {
        println!("Found {} companies with SDR-related job titles", rows.len());
    } else {
        println!("Wrote data for {} companies", rows.len());
    }
    Ok(())
}

fn main() {
    let args = ExportArgs::parse();
    logger::init_cli_logger(args.log.verbose, args.log.log_json);

    if let Err(e) = run(&args) {
        exit_with(&e);
    }
}
