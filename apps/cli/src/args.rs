use std::env;
use std::path::PathBuf;

use traffic_app::ReportParams;

#[derive(Debug, Default)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub report: ReportParams,
    pub no_ingest: bool,
}

pub fn parse_args() -> Result<CliArgs, String> {
    parse_from(env::args().skip(1))
}

fn parse_from<I>(args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = next_value(&mut args, "--config")?;
                parsed.config = Some(PathBuf::from(value));
            }
            "--month" => {
                parsed.report.month = Some(next_value(&mut args, "--month")?);
            }
            "--day" => {
                parsed.report.day = Some(next_value(&mut args, "--day")?);
            }
            "--top" => {
                let value = next_value(&mut args, "--top")?;
                let top = value
                    .parse::<usize>()
                    .map_err(|_| format!("invalid top value: {value}"))?;
                parsed.report.top = Some(top);
            }
            "--no-ingest" => {
                parsed.no_ingest = true;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument: {arg}"));
            }
        }
    }

    Ok(parsed)
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("missing value for {flag}"))
}

pub fn print_help() {
    println!(
        "Traffic Parser\n\n\
Usage:\n  traffic-parser [--config <path>] [--month YYYY-MM] [--day YYYY-MM-DD] [--top <n>] [--no-ingest]\n\n\
Options:\n  --config <path>   Read settings from this file instead of the default location\n  --month <YYYY-MM> Print the rollup for a month\n  --day <date>      Print the aggregate for a single day\n  --top <n>         Number of entries in ranked lists (default 10)\n  --no-ingest       Skip reading logs and only print reports\n  -h, --help        Show this help message\n"
    );
}
