//! CLI definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use vcf2csv_core::{ConvertConfig, ConvertResult, ProgressReporter, convert_file};
use vcf2csv_shared::{
    AppConfig, InvalidRecordPolicy, NameDecoding, Vcf2CsvError, config_file_path, init_config,
    load_config, load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// vcf2csv: move phone contacts into Outlook.
#[derive(Parser)]
#[command(
    name = "vcf2csv",
    version,
    about = "Convert a vCard 2.1 contact export into an Outlook CSV import file.",
    long_about = None,
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.vcf2csv/vcf2csv.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// vCard file to convert.
    #[arg(required = true)]
    pub input: Option<PathBuf>,

    /// CSV file to write (defaults to INPUT with a .csv extension).
    pub output: Option<PathBuf>,

    /// How formatted names are decoded (overrides the config file).
    #[arg(long, value_name = "MODE")]
    pub decoding: Option<DecodingArg>,

    /// Shorthand for `--decoding quoted-printable`.
    #[arg(long, conflicts_with_all = ["decoding", "auto_decode"])]
    pub quote_printed: bool,

    /// Shorthand for `--decoding auto`.
    #[arg(long, conflicts_with = "decoding")]
    pub auto_decode: bool,

    /// Skip records without a usable name instead of aborting.
    #[arg(long, overrides_with = "abort_on_invalid")]
    pub skip_invalid: bool,

    /// Abort on the first record without a usable name.
    #[arg(long, overrides_with = "skip_invalid")]
    pub abort_on_invalid: bool,

    /// Start the CSV with a UTF-8 byte-order mark.
    #[arg(long, overrides_with = "no_bom")]
    pub bom: bool,

    /// Write the CSV without a byte-order mark.
    #[arg(long, overrides_with = "bom")]
    pub no_bom: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Name decoding mode accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum DecodingArg {
    Raw,
    QuotedPrintable,
    Auto,
}

impl From<DecodingArg> for NameDecoding {
    fn from(arg: DecodingArg) -> Self {
        match arg {
            DecodingArg::Raw => NameDecoding::Raw,
            DecodingArg::QuotedPrintable => NameDecoding::QuotedPrintable,
            DecodingArg::Auto => NameDecoding::Auto,
        }
    }
}

impl Cli {
    /// Decoding mode chosen on the command line, if any.
    fn name_decoding(&self) -> Option<NameDecoding> {
        if self.quote_printed {
            Some(NameDecoding::QuotedPrintable)
        } else if self.auto_decode {
            Some(NameDecoding::Auto)
        } else {
            self.decoding.map(NameDecoding::from)
        }
    }

    fn invalid_record_policy(&self) -> Option<InvalidRecordPolicy> {
        match (self.skip_invalid, self.abort_on_invalid) {
            (true, _) => Some(InvalidRecordPolicy::Skip),
            (_, true) => Some(InvalidRecordPolicy::Abort),
            _ => None,
        }
    }

    fn utf8_bom(&self) -> Option<bool> {
        match (self.bom, self.no_bom) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Subcommands besides the default conversion.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "vcf2csv=info",
        1 => "vcf2csv=debug",
        _ => "vcf2csv=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(cli.config.as_deref()),
        },
        None => {
            let app_config = resolve_config(cli.config.as_deref())?;
            let config = build_convert_config(&cli, &app_config)?;
            cmd_convert(&config)
        }
    }
}

/// Merge config-file defaults with command-line flags. Flags win.
fn build_convert_config(cli: &Cli, app: &AppConfig) -> Result<ConvertConfig> {
    let input = cli
        .input
        .clone()
        .ok_or_else(|| eyre!("an input vCard file is required"))?;

    let mut config = ConvertConfig::new(input, app);
    config.output.clone_from(&cli.output);
    if let Some(decoding) = cli.name_decoding() {
        config.name_decoding = decoding;
    }
    if let Some(policy) = cli.invalid_record_policy() {
        config.on_invalid_record = policy;
    }
    if let Some(bom) = cli.utf8_bom() {
        config.utf8_bom = bom;
    }
    Ok(config)
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

fn cmd_convert(config: &ConvertConfig) -> Result<()> {
    info!(
        input = %config.input.display(),
        decoding = %config.name_decoding,
        "converting contacts"
    );

    let reporter = CliProgress::new();
    let result = convert_file(config, &reporter).inspect_err(|_| reporter.clear())?;

    println!();
    println!("  Contacts converted successfully!");
    println!("  Records: {}", result.stats.records);
    println!("  Rows:    {}", result.stats.rows);
    if result.stats.skipped > 0 {
        println!("  Skipped: {}", result.stats.skipped);
    }
    if result.stats.phones_dropped > 0 {
        println!("  Phones dropped (over 12 per contact): {}", result.stats.phones_dropped);
    }
    println!("  Output:  {}", result.output_path.display());
    println!("  Time:    {:.2}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn clear(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn record_converted(&self, name: &str, current: usize) {
        self.spinner.set_message(format!("Converting [{current}] {name}"));
    }

    fn record_skipped(&self, error: &Vcf2CsvError) {
        self.spinner.set_message(format!("Skipped: {error}"));
    }

    fn done(&self, _result: &ConvertResult) {
        self.clear();
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let source = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };
    println!("# {}", source.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_input_and_optional_output() {
        let cli = Cli::try_parse_from(["vcf2csv", "contacts.vcf"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("contacts.vcf")));
        assert!(cli.output.is_none());
        assert!(!cli.quote_printed);

        let cli =
            Cli::try_parse_from(["vcf2csv", "contacts.vcf", "out.csv", "--quote-printed"]).unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("out.csv")));
        assert!(cli.quote_printed);
    }

    #[test]
    fn input_is_required_without_subcommand() {
        assert!(Cli::try_parse_from(["vcf2csv"]).is_err());
        assert!(Cli::try_parse_from(["vcf2csv", "a.vcf", "b.csv", "c"]).is_err());
    }

    #[test]
    fn decoding_flags_conflict() {
        assert!(
            Cli::try_parse_from(["vcf2csv", "a.vcf", "--quote-printed", "--auto-decode"]).is_err()
        );
    }

    fn non_default_app_config() -> AppConfig {
        let mut app = AppConfig::default();
        app.defaults.name_decoding = NameDecoding::QuotedPrintable;
        app.defaults.on_invalid_record = InvalidRecordPolicy::Skip;
        app.defaults.utf8_bom = true;
        app.defaults.output_extension = "txt".to_string();
        app
    }

    fn merged(args: &[&str], app: &AppConfig) -> ConvertConfig {
        let cli = Cli::try_parse_from(args).unwrap();
        build_convert_config(&cli, app).unwrap()
    }

    #[test]
    fn config_file_values_apply_without_flags() {
        let app = non_default_app_config();
        let config = merged(&["vcf2csv", "a.vcf"], &app);

        assert_eq!(config.input, PathBuf::from("a.vcf"));
        assert_eq!(config.name_decoding, NameDecoding::QuotedPrintable);
        assert_eq!(config.on_invalid_record, InvalidRecordPolicy::Skip);
        assert!(config.utf8_bom);
        assert_eq!(config.output_path(), PathBuf::from("a.txt"));
    }

    #[test]
    fn flags_switch_config_values_back_off() {
        let app = non_default_app_config();
        let config = merged(
            &[
                "vcf2csv",
                "a.vcf",
                "out.csv",
                "--decoding",
                "raw",
                "--abort-on-invalid",
                "--no-bom",
            ],
            &app,
        );

        assert_eq!(config.name_decoding, NameDecoding::Raw);
        assert_eq!(config.on_invalid_record, InvalidRecordPolicy::Abort);
        assert!(!config.utf8_bom);
        assert_eq!(config.output_path(), PathBuf::from("out.csv"));
    }

    #[test]
    fn flags_switch_default_values_on() {
        let app = AppConfig::default();
        let config = merged(&["vcf2csv", "a.vcf", "--auto-decode", "--skip-invalid", "--bom"], &app);

        assert_eq!(config.name_decoding, NameDecoding::Auto);
        assert_eq!(config.on_invalid_record, InvalidRecordPolicy::Skip);
        assert!(config.utf8_bom);

        let config = merged(&["vcf2csv", "a.vcf", "--decoding", "quoted-printable"], &app);
        assert_eq!(config.name_decoding, NameDecoding::QuotedPrintable);
    }

    #[test]
    fn last_of_paired_flags_wins() {
        let app = AppConfig::default();
        let config = merged(&["vcf2csv", "a.vcf", "--bom", "--no-bom"], &app);
        assert!(!config.utf8_bom);

        let config = merged(&["vcf2csv", "a.vcf", "--abort-on-invalid", "--skip-invalid"], &app);
        assert_eq!(config.on_invalid_record, InvalidRecordPolicy::Skip);
    }

    #[test]
    fn decoding_shorthands_conflict_with_explicit_mode() {
        assert!(
            Cli::try_parse_from(["vcf2csv", "a.vcf", "--quote-printed", "--decoding", "raw"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["vcf2csv", "a.vcf", "--decoding", "latin1"]).is_err());
    }

    #[test]
    fn config_subcommand_parses() {
        let cli = Cli::try_parse_from(["vcf2csv", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));
        assert!(cli.input.is_none());
    }
}
