//! Watch command implementation.

use crate::session::CliController;
use quotesync_engine::SyncTrigger;
use std::sync::atomic::AtomicBool;

/// Syncs immediately, then keeps syncing on the configured interval
/// until the process is interrupted.
pub fn run(controller: &CliController) {
    println!("Watching for changes. Press Ctrl+C to stop.");
    controller.trigger(SyncTrigger::Manual);

    let stop = AtomicBool::new(false);
    controller.run_periodic(&stop);
}
