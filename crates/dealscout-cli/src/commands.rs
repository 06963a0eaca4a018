//! One-shot command handlers.

use std::sync::Arc;

use dealscout_catalog::DealerStatusProbe;
use dealscout_core::AppConfig;

use crate::render;
use crate::session::{build_backends, LiveSession, SearchOutcome};
use crate::SearchArgs;

pub(crate) async fn run_suggest(config: &AppConfig, partial: &str) -> anyhow::Result<()> {
    let (resolver, _client) = build_backends(config)?;
    let dealers = resolver.suggest(partial).await;

    if dealers.is_empty() {
        println!("No matching dealerships.");
        return Ok(());
    }
    for dealer in dealers {
        match dealer.feed_id() {
            Some(feed_id) => println!("{} ({feed_id})", dealer.name),
            None => println!("{} (no website on record)", dealer.name),
        }
    }
    Ok(())
}

pub(crate) async fn run_status(config: &AppConfig, dealer_name: &str) -> anyhow::Result<()> {
    let (resolver, client) = build_backends(config)?;
    let dealer = resolver.resolve(dealer_name).await?;

    let probe = DealerStatusProbe::new(client);
    let status = probe.check(dealer.feed_id()).await;
    println!("{}: {}", dealer.name, render::status(status));
    Ok(())
}

pub(crate) async fn run_search(config: &AppConfig, args: &SearchArgs) -> anyhow::Result<()> {
    let (resolver, client) = build_backends(config)?;

    if args.check_status {
        let dealer = resolver.resolve(&args.dealer).await?;
        let status = DealerStatusProbe::new(Arc::clone(&client))
            .check(dealer.feed_id())
            .await;
        if status.blocks_search() {
            anyhow::bail!("{}: {}", dealer.name, render::status(status));
        }
    }

    let session = LiveSession::from_app_config(config, resolver, client);
    let outcome = session.search(&args.dealer, &args.amount).await?;

    match outcome {
        SearchOutcome::NoInventory(info) => {
            print!("{}", render::no_inventory(&info));
            return Ok(());
        }
        SearchOutcome::Results { pages_failed, .. } if pages_failed > 0 => {
            tracing::warn!(pages_failed, "some inventory pages could not be fetched");
        }
        SearchOutcome::Results { .. } | SearchOutcome::Superseded => {}
    }

    session.apply_filters(args.filters());
    session.go_to_page(args.page);
    let view = session.visible_page();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view.vehicles)?);
    } else {
        print!("{}", render::page_view(&view, session.qualified_amount()));
    }
    if args.options {
        print!("{}", render::options(&session.options()));
    }
    Ok(())
}
