//! Export command implementation.

use crate::session::CliController;
use std::fs;
use std::path::Path;

/// Exports the collection as JSON to a file, or to stdout when no file
/// is given.
pub fn run(
    controller: &CliController,
    file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let payload = controller.export()?;
    match file {
        Some(file) => {
            fs::write(file, &payload)?;
            println!(
                "Exported {} quote(s) to {}",
                controller.store().len(),
                file.display()
            );
        }
        None => println!("{payload}"),
    }
    Ok(())
}
