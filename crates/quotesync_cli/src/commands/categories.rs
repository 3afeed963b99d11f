//! Categories command implementation.

use crate::session::CliController;

/// Prints every category present in the collection.
pub fn run(controller: &CliController) {
    let categories = controller.store().categories();
    if categories.is_empty() {
        println!("No categories yet. Add some quotes!");
        return;
    }
    for category in &categories {
        let count = controller.store().by_category(category).len();
        println!("{category} ({count})");
    }
}
