//! Given steps for feed watcher BDD scenarios.

use super::world::{FeedWorld, run_async};
use contentplan::{
    feed::{
        domain::FeedSubscription,
        ports::{FeedFetchError, FeedSubscriptionRepository},
    },
    pipeline::{domain::PipelineStage, ports::PipelineStageRepository},
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a workspace with a stage "{name}" of type "{column_type}""#)]
fn workspace_with_stage(
    world: &mut FeedWorld,
    name: String,
    column_type: String,
) -> Result<(), eyre::Report> {
    let stage = PipelineStage::new(world.workspace, name, 0, column_type)
        .wrap_err("construct stage")?;
    run_async(world.stages.store(&stage)).wrap_err("store stage")?;
    world.stage = Some(stage);
    Ok(())
}

fn subscribe(world: &FeedWorld, url: String, auto_generate: bool) -> Result<(), eyre::Report> {
    let base = FeedSubscription::new(world.workspace, "Industry news", url)
        .wrap_err("construct subscription")?
        .with_stage(world.stage.as_ref().map(PipelineStage::id));
    let subscription = if auto_generate {
        base.with_auto_generation("Write a post about {title}: {link}")
    } else {
        base
    };
    run_async(world.subscriptions.store(&subscription)).wrap_err("store subscription")?;
    Ok(())
}

#[given(r#"a subscription to "{url}""#)]
fn plain_subscription(world: &mut FeedWorld, url: String) -> Result<(), eyre::Report> {
    subscribe(world, url, false)
}

#[given(r#"an auto-generating subscription to "{url}""#)]
fn generating_subscription(world: &mut FeedWorld, url: String) -> Result<(), eyre::Report> {
    subscribe(world, url, true)
}

#[given(r#"the feed at "{url}" lists items "{first}" and "{second}""#)]
fn feed_lists_items(world: &mut FeedWorld, url: String, first: String, second: String) {
    let items: String = [first, second]
        .iter()
        .map(|guid| {
            format!(
                "<item><title>Story {guid}</title><link>https://news.example.com/{guid}</link>\
                 <description>About {guid}</description><guid>{guid}</guid></item>"
            )
        })
        .collect();
    world
        .fetcher
        .serve(url, format!("<rss><channel>{items}</channel></rss>"));
}

#[given(r#"the feed at "{url}" fails with status {status:u16}"#)]
fn feed_fails(world: &mut FeedWorld, url: String, status: u16) {
    world.fetcher.fail(url, FeedFetchError::Status { status });
}
