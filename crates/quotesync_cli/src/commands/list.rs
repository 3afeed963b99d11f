//! List command implementation.

use crate::session::CliController;

/// Prints the collection, optionally filtered by category.
pub fn run(
    controller: &CliController,
    category: Option<&str>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let quotes = match category {
        Some(category) => controller.store().by_category(category),
        None => controller.store().all(),
    };

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&quotes)?);
        }
        _ => {
            if quotes.is_empty() {
                println!("No quotes found. Add some quotes!");
                return Ok(());
            }
            for quote in &quotes {
                let id = quote
                    .id
                    .map_or_else(|| "local".to_string(), |id| id.to_string());
                println!("[{id}] \"{}\" ({}, v{})", quote.text, quote.category, quote.version);
            }
            println!();
            println!("{} quote(s)", quotes.len());
        }
    }

    Ok(())
}
