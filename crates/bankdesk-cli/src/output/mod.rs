pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use bankdesk_core::BankDeskError;
use colored::Colorize;
use serde_json::Value;
use std::process;

use crate::input::CliResult;
use crate::OutputFormat;

/// Print a subcommand's result in the chosen format and exit.
///
/// Core errors keep their reason code (`error[UNKNOWN_BANK]: ...`); anything
/// else, such as a missing flag or unreadable file, prints as a plain error.
pub fn emit(format: &OutputFormat, result: CliResult<Value>) -> ! {
    let value = match result {
        Ok(value) => value,
        Err(e) => {
            match e.downcast_ref::<BankDeskError>() {
                Some(core) => {
                    eprintln!("{}: {}", format!("error[{}]", core.code()).red().bold(), core)
                }
                None => eprintln!("{}: {}", "error".red().bold(), e),
            }
            process::exit(1);
        }
    };

    match format {
        OutputFormat::Json => json::print_json(&value),
        OutputFormat::Table => table::print_table(&value),
        OutputFormat::Csv => {
            csv_out::print_csv(&value);
            warn_on_stderr(&value);
        }
        OutputFormat::Minimal => {
            minimal::print_minimal(&value);
            warn_on_stderr(&value);
        }
    }
    process::exit(0);
}

// CSV and minimal output have no room for the envelope's warnings.
fn warn_on_stderr(value: &Value) {
    let Some(Value::Array(warnings)) = value.get("warnings") else {
        return;
    };
    for w in warnings.iter().filter_map(Value::as_str) {
        eprintln!("{}: {}", "warning".yellow().bold(), w);
    }
}
