//! Command-line entry point for one ledger invocation.
//!
//! # Responsibility
//! - Map command-line arguments onto `LedgerConfig`.
//! - Run exactly one named invocation and report it on stdout/stderr.

use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use title_ledger_core::config::DEFAULT_DB_FILE_NAME;
use title_ledger_core::model::ids::DEFAULT_PROPERTY_ID_PREFIX;
use title_ledger_core::{
    core_version, default_log_level, init_logging, supported_functions, LedgerApi, LedgerConfig,
};

#[derive(Parser)]
#[command(name = "title-ledger")]
#[command(about = "Property title ledger", long_about = None)]
struct Cli {
    /// Ledger database file
    #[arg(long, env = "TITLE_LEDGER_DB", default_value = DEFAULT_DB_FILE_NAME)]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "TITLE_LEDGER_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "TITLE_LEDGER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Prefix stripped from property ids in ownership views
    #[arg(long, default_value = DEFAULT_PROPERTY_ID_PREFIX)]
    property_id_prefix: String,

    /// Print supported function names and exit
    #[arg(long, default_value_t = false)]
    list_functions: bool,

    /// Function name, e.g. propertyTransaction or getOwnership
    #[arg(required_unless_present = "list_functions")]
    function: Option<String>,

    /// Function arguments in order
    args: Vec<String>,
}

impl Cli {
    fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            db_path: self.db.clone(),
            log_level: self
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: self.log_dir.clone(),
            property_id_prefix: self.property_id_prefix.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list_functions {
        println!("title_ledger_core version={}", core_version());
        for name in supported_functions() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    let config = match cli.ledger_config().validate() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let mut api = match LedgerApi::open(&config) {
        Ok(api) => api,
        Err(err) => {
            error!("event=cli_open module=cli status=error error={err}");
            eprintln!("unable to open ledger `{}`: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let function = cli.function.as_deref().unwrap_or_default();
    let response = api.invoke(function, &cli.args);
    if response.ok {
        println!("{}", response.payload.unwrap_or(response.message));
        ExitCode::SUCCESS
    } else {
        eprintln!("{}", response.message);
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use title_ledger_core::model::ids::DEFAULT_PROPERTY_ID_PREFIX;
    use title_ledger_core::IdDisplayPolicy;

    #[test]
    fn prefix_defaults_to_core_constant() {
        let cli = Cli::try_parse_from(["title-ledger", "getOwnership", "ownership_1"]).unwrap();
        let config = cli.ledger_config();

        assert_eq!(config.property_id_prefix, DEFAULT_PROPERTY_ID_PREFIX);
        assert_eq!(cli.function.as_deref(), Some("getOwnership"));
        assert_eq!(cli.args, vec!["ownership_1".to_string()]);
    }

    #[test]
    fn prefix_flag_reaches_id_policy() {
        let cli = Cli::try_parse_from([
            "title-ledger",
            "--property-id-prefix",
            "lot-",
            "getOwnership",
            "ownership_1",
        ])
        .unwrap();

        let policy = cli.ledger_config().id_display_policy();
        assert_eq!(policy.display_property_id("lot-7"), "7");
        assert_eq!(policy.display_property_id("property_7"), "property_7");
    }
}
