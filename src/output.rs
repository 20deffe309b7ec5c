use std::sync::OnceLock;

use serde::Serialize;

use crate::cli::OutputFormat;

/// Global output format setting
static OUTPUT_FORMAT: OnceLock<OutputFormat> = OnceLock::new();

pub fn set_format(format: OutputFormat) {
    let _ = OUTPUT_FORMAT.set(format);
}

pub fn format() -> OutputFormat {
    OUTPUT_FORMAT.get().copied().unwrap_or_default()
}

/// Print a single item or JSON depending on output mode
pub fn print_item<T: Serialize>(item: &T, display: impl FnOnce(&T)) {
    match format() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(item).unwrap_or_default())
        }
        OutputFormat::Compact => println!("{}", serde_json::to_string(item).unwrap_or_default()),
        OutputFormat::Table => display(item),
    }
}

/// Print a message (skipped in JSON mode, or prints simple object)
pub fn print_message(message: &str) {
    match format() {
        OutputFormat::Table => println!("{message}"),
        _ => println!("{}", serde_json::json!({ "message": message })),
    }
}
