//! Add command implementation.

use crate::session::CliController;

/// Adds a quote and fires the post-add sync.
pub fn run(
    controller: &CliController,
    text: &str,
    category: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = controller.add_quote(text, category)?;
    println!("Added \"{}\" to {}", record.text, record.category);
    Ok(())
}
