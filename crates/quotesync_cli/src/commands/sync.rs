//! Sync command implementation.

use crate::session::CliController;
use quotesync_engine::SyncTrigger;

/// Runs a single sync cycle and prints a summary.
pub fn run(controller: &CliController) -> Result<(), Box<dyn std::error::Error>> {
    let Some(result) = controller.trigger(SyncTrigger::Manual) else {
        return Err("a sync cycle is already in flight".into());
    };

    println!();
    println!("Sync finished: {:?}", result.outcome);
    println!("  Pulled:    {} quote(s)", result.pulled);
    println!("  Conflicts: {}", result.conflicts);
    println!("  Changed:   {}", if result.changed { "yes" } else { "no" });
    println!("  Duration:  {:?}", result.duration);

    let stats = controller.stats();
    if let Some(error) = stats.last_error {
        println!("  Error:     {error}");
    }

    Ok(())
}
