//! Import command implementation.

use crate::session::CliController;
use std::fs;
use std::path::Path;

/// Imports quotes from a JSON file into the collection.
pub fn run(controller: &CliController, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(file)?;
    let count = controller.import(&raw)?;
    println!("Imported {count} quote(s) from {}", file.display());
    Ok(())
}
