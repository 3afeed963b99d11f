//! Show command implementation.

use crate::session::CliController;

/// Prints a random quote, optionally restricted to one category.
pub fn run(controller: &CliController, category: Option<&str>) {
    match controller.store().random(category) {
        Some(quote) => {
            println!("\"{}\"", quote.text);
            println!("    {}", quote.category);
        }
        None => {
            println!("No quotes found in this category. Add some quotes!");
        }
    }
}
