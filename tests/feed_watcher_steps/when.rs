//! When steps for feed watcher BDD scenarios.

use super::world::{FeedWorld, run_async};
use rstest_bdd_macros::when;

#[when("the feed watcher runs")]
fn watcher_runs(world: &mut FeedWorld) {
    let watcher = world.watcher();
    world.last_report = Some(run_async(watcher.run()));
}
