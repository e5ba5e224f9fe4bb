use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "dwc-cli")]
#[command(about = "Command line client for browsing Darwin Core gateway records")]
#[command(version)]
#[command(after_help = "Examples:
  dwc-cli summary                               # Record count and timestamps
  dwc-cli records                               # First page with the default columns
  dwc-cli records --start 25 --count 10         # Another page
  dwc-cli records --orderby lat --order desc    # Sorted
  dwc-cli records --fields id,genus_s,lat       # Chosen columns
  dwc-cli record MVZ:Herp:1234                  # One record as a detail grid
  dwc-cli fields                                # Fields the gateway publishes
  dwc-cli field genus_s --values                # Distinct values with counts
  dwc-cli config set --url http://localhost:8000

Environment Variables:
  DWCV_URL      Gateway server URL")]
pub struct Cli {
    /// Increase log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Custom configuration directory path
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Gateway server URL
    #[arg(long, global = true, env = "DWCV_URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configuration management (show, set, validate)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Gateway summary
    Summary,
    /// List a page of records
    Records(RecordsArgs),
    /// Show a single record
    Record {
        /// Record identifier
        id: String,
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// List the fields the gateway publishes
    Fields {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Describe one field
    Field(FieldArgs),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Set configuration values
    #[command(after_help = "Examples:
  dwc-cli config set --url http://localhost:8000
  dwc-cli config set --base-dir /gateway/ --count 50")]
    Set {
        /// Gateway server URL
        #[arg(long)]
        url: Option<String>,
        /// API path below the server URL
        #[arg(long)]
        base_dir: Option<String>,
        /// Records per page
        #[arg(long)]
        count: Option<u64>,
    },
    /// Check that the configured gateway answers
    Validate,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Args, Debug)]
pub struct RecordsArgs {
    /// Offset of the first record
    #[arg(long, default_value = "0")]
    pub start: u64,

    /// Records per page (defaults to the configured page size)
    #[arg(long, short = 'n')]
    pub count: Option<u64>,

    /// Columns to show, comma-separated field keys
    #[arg(long)]
    pub fields: Option<String>,

    /// Field to sort by
    #[arg(long)]
    pub orderby: Option<String>,

    /// Sort order: asc or desc
    #[arg(long)]
    pub order: Option<String>,

    /// Gateway filter expression
    #[arg(long)]
    pub filter: Option<String>,

    /// Hide the row number column
    #[arg(long)]
    pub no_row_numbers: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct FieldArgs {
    /// Field key
    pub name: String,

    /// List distinct values with their counts
    #[arg(long)]
    pub values: bool,

    /// Restrict values to records matching this filter
    #[arg(long, requires = "values")]
    pub filter: Option<String>,

    /// Maximum number of values
    #[arg(long, requires = "values")]
    pub count: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records_args() {
        let cli = Cli::try_parse_from([
            "dwc-cli", "records", "--start", "25", "-n", "10", "--orderby", "lat", "--order",
            "desc", "--fields", "id,lat", "--format", "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Records(args) => {
                assert_eq!(args.start, 25);
                assert_eq!(args.count, Some(10));
                assert_eq!(args.orderby.as_deref(), Some("lat"));
                assert_eq!(args.order.as_deref(), Some("desc"));
                assert_eq!(args.fields.as_deref(), Some("id,lat"));
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_verbose_count_is_global() {
        let cli = Cli::try_parse_from(["dwc-cli", "summary", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_field_filter_requires_values() {
        assert!(Cli::try_parse_from(["dwc-cli", "field", "genus_s", "--filter", "x"]).is_err());
        let cli =
            Cli::try_parse_from(["dwc-cli", "field", "genus_s", "--values", "--count", "5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Field(FieldArgs { values: true, count: Some(5), .. })
        ));
    }
}
