//! formcheck CLI - inspection plan formula validator

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use formcheck::prelude::*;
use formcheck::{template_sheet, CsvWriteOptions, CsvWriter};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::logging::{init_logging, LogConfig};

#[derive(Parser)]
#[command(name = "formcheck")]
#[command(
    author,
    version,
    about = "Validate the formulas of an inspection plan against a per-site specification"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// More log output (-v per group, -vv per boundary case)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a plan and write it back with the verdict columns appended
    Check {
        /// Input plan (xlsx, xls, csv)
        input: PathBuf,

        /// Site code selecting the formula specification
        #[arg(short, long, default_value = "3101")]
        site: SiteCode,

        /// Output file, xlsx or csv by extension (default: CSV on stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON formula specification replacing the built-in one
        #[arg(long)]
        spec: Option<PathBuf>,

        /// Column holding the lower tolerance limit
        #[arg(long, default_value = "LW_TOL_LMT")]
        lower_col: String,

        /// Column holding the upper tolerance limit
        #[arg(long, default_value = "UP_TOL_LMT")]
        upper_col: String,

        /// Language of the verdict strings (en, tr)
        #[arg(long, default_value = "en")]
        locale: Locale,

        /// Row order of the output
        #[arg(long, value_enum, default_value = "input")]
        order: OrderArg,
    },

    /// Write an empty input template holding the expected columns
    Template {
        /// Output file (xlsx or csv)
        output: PathBuf,
    },

    /// List the sites of a formula specification
    Sites {
        /// JSON formula specification (default: built-in)
        #[arg(long)]
        spec: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    /// Same order as the input
    Input,
    /// By (plan group, operation), then ordinal position
    Grouped,
}

impl From<OrderArg> for OutputOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Input => OutputOrder::Input,
            OrderArg::Grouped => OutputOrder::Grouped,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose, cli.quiet));

    match cli.command {
        Commands::Check {
            input,
            site,
            output,
            spec,
            lower_col,
            upper_col,
            locale,
            order,
        } => {
            let options = ValidationOptions {
                site,
                columns: ColumnNames {
                    lower_limit: lower_col,
                    upper_limit: upper_col,
                    ..Default::default()
                },
                locale,
                output_order: order.into(),
            };
            check(&input, output.as_deref(), spec.as_deref(), &options)
        }
        Commands::Template { output } => write_template(&output),
        Commands::Sites { spec } => list_sites(spec.as_deref()),
    }
}

fn load_spec(path: Option<&Path>) -> Result<FormulaSpec> {
    match path {
        Some(path) => FormulaSpec::from_json_file(path)
            .with_context(|| format!("Failed to load specification '{}'", path.display())),
        None => Ok(FormulaSpec::builtin()),
    }
}

fn check(
    input: &Path,
    output: Option<&Path>,
    spec: Option<&Path>,
    options: &ValidationOptions,
) -> Result<()> {
    let spec = load_spec(spec)?;

    let sheet =
        Sheet::open(input).with_context(|| format!("Failed to open '{}'", input.display()))?;

    let report = sheet
        .validation_report(&spec, options)
        .with_context(|| format!("Failed to validate '{}'", input.display()))?;
    let result = formcheck::export_sheet(&sheet, &report, options.locale);

    if let Some(output_path) = output {
        result
            .save(output_path)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        info!(rows = result.row_count(), path = %output_path.display(), "wrote result");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        CsvWriter::write(&result, &mut handle, &CsvWriteOptions::default())
            .context("Failed to write to stdout")?;
        handle.flush().context("Failed to write to stdout")?;
    }

    Ok(())
}

fn write_template(output: &Path) -> Result<()> {
    template_sheet(&ColumnNames::default())
        .save(output)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    info!(path = %output.display(), "wrote template");
    Ok(())
}

fn list_sites(spec: Option<&Path>) -> Result<()> {
    let spec = load_spec(spec)?;

    for code in spec.site_codes() {
        let count = spec.site(code).map_or(0, |site| site.len());
        println!("{}\t{} formulas", code, count);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from([
            "formcheck", "check", "plan.xlsx", "--site", "2901", "--order", "grouped", "--locale",
            "tr", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);

        let Commands::Check {
            site,
            order,
            locale,
            output,
            ..
        } = cli.command
        else {
            panic!("expected the check command");
        };
        assert_eq!(site, SiteCode::new("2901"));
        assert!(matches!(order, OrderArg::Grouped));
        assert_eq!(locale, Locale::Turkish);
        assert_eq!(output, None);
    }

    #[test]
    fn test_check_defaults() {
        let cli = Cli::try_parse_from(["formcheck", "check", "plan.csv"]).unwrap();
        let Commands::Check {
            site,
            lower_col,
            order,
            ..
        } = cli.command
        else {
            panic!("expected the check command");
        };
        assert_eq!(site, SiteCode::default());
        assert_eq!(lower_col, "LW_TOL_LMT");
        assert!(matches!(order, OrderArg::Input));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["formcheck", "-q", "-v", "sites"]).is_err());
    }
}
