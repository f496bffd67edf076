//! Then steps for feed watcher BDD scenarios.

use super::world::{FeedWorld, run_async};
use contentplan::feed::ports::FeedSubscriptionRepository;
use rstest_bdd_macros::then;

#[then("the run reports {count:usize} new items")]
fn run_reports_new_items(world: &FeedWorld, count: usize) -> Result<(), eyre::Report> {
    let created = world.report()?.total_new_items();
    if created != count {
        return Err(eyre::eyre!("expected {count} new items, found {created}"));
    }
    Ok(())
}

#[then("{count:usize} subscriptions were processed")]
fn subscriptions_processed(world: &FeedWorld, count: usize) -> Result<(), eyre::Report> {
    let processed = world.report()?.subscriptions_processed;
    if processed != count {
        return Err(eyre::eyre!("expected {count} subscriptions, found {processed}"));
    }
    Ok(())
}

#[then(r#"the stage holds tasks "{first}" and "{second}" at positions 0 and 1"#)]
fn stage_holds_tasks(world: &FeedWorld, first: String, second: String) -> Result<(), eyre::Report> {
    let stage = world
        .stage
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing stage in scenario world"))?;
    let tasks = world
        .tasks
        .all()
        .map_err(|err| eyre::eyre!("listing tasks failed: {err}"))?;
    let placed: Vec<(String, i32)> = tasks
        .iter()
        .filter(|task| task.stage_id() == Some(stage.id()))
        .map(|task| (task.title().to_owned(), task.position()))
        .collect();
    let expected = vec![(first, 0), (second, 1)];
    if placed != expected {
        return Err(eyre::eyre!("expected tasks {expected:?}, found {placed:?}"));
    }
    Ok(())
}

#[then("{count:usize} generation requests were dispatched")]
fn generation_dispatched(world: &FeedWorld, count: usize) -> Result<(), eyre::Report> {
    let dispatched = world.dispatcher.requests();
    if dispatched.len() != count {
        return Err(eyre::eyre!(
            "expected {count} dispatches, found {}",
            dispatched.len()
        ));
    }
    if let Some(request) = dispatched
        .iter()
        .find(|request| !request.prompt.starts_with("Write a post about Story"))
    {
        return Err(eyre::eyre!("unexpected prompt {:?}", request.prompt));
    }
    Ok(())
}

#[then(r#"the subscription has seen "{first}" and "{second}""#)]
fn subscription_has_seen(
    world: &FeedWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let subscriptions = run_async(world.subscriptions.list_active())
        .map_err(|err| eyre::eyre!("listing subscriptions failed: {err}"))?;
    let subscription = subscriptions
        .first()
        .ok_or_else(|| eyre::eyre!("no subscription stored"))?;
    if !(subscription.has_seen(&first) && subscription.has_seen(&second)) {
        return Err(eyre::eyre!(
            "seen-set {:?} is missing {first} or {second}",
            subscription.items_seen()
        ));
    }
    if subscription.last_item_guid() != Some(first.as_str()) {
        return Err(eyre::eyre!(
            "expected watermark {first}, found {:?}",
            subscription.last_item_guid()
        ));
    }
    Ok(())
}

#[then(r#"the subscription to "{url}" reports "{message}""#)]
fn subscription_reports_error(
    world: &FeedWorld,
    url: String,
    message: String,
) -> Result<(), eyre::Report> {
    let subscriptions = run_async(world.subscriptions.list_active())
        .map_err(|err| eyre::eyre!("listing subscriptions failed: {err}"))?;
    let subscription = subscriptions
        .iter()
        .find(|subscription| subscription.feed_url() == url)
        .ok_or_else(|| eyre::eyre!("no subscription for {url}"))?;
    let result = world
        .report()?
        .results
        .iter()
        .find(|result| result.subscription_id == subscription.id())
        .ok_or_else(|| eyre::eyre!("no result for {url}"))?;
    if result.error.as_deref() != Some(message.as_str()) {
        return Err(eyre::eyre!("expected error {message:?}, found {:?}", result.error));
    }
    Ok(())
}
