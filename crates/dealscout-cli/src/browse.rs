//! Line-oriented interactive session.
//!
//! Typing a dealer name feeds the suggestion debouncer; picking a suggestion
//! starts the status monitor. Suggestions and status changes are printed as
//! they arrive, interleaved with command output.

use std::sync::Arc;
use std::time::Duration;

use dealscout_catalog::{CatalogClient, StatusMonitor};
use dealscout_core::{AppConfig, Dealer, FilterField};
use dealscout_directory::SuggestionDebouncer;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;
use crate::session::{build_backends, LiveSession, SearchError, SearchOutcome};

const HELP: &str = "\
commands:
  dealer <text>         type a dealership name (suggestions follow)
  pick <n>              choose suggestion n
  amount <value>        set the qualified amount
  search                run the search
  filter <field> <v>    set a filter (year-from, year-to, max-mileage,
                        body-type, make, model, trim); empty v clears it
  reset                 clear all filters
  page <n> | next | prev
  options               list filter choices
  quit";

/// Parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Input {
    Dealer(String),
    Pick(usize),
    Amount(String),
    Search,
    Filter(FilterField, String),
    Reset,
    Page(usize),
    Next,
    Prev,
    Options,
    Help,
    Quit,
}

impl Input {
    pub(crate) fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        match word.to_ascii_lowercase().as_str() {
            "dealer" | "d" => Ok(Self::Dealer(rest.to_owned())),
            "pick" | "p" => rest
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(Self::Pick)
                .ok_or_else(|| format!("expected a suggestion number, got '{rest}'")),
            "amount" | "a" => Ok(Self::Amount(rest.to_owned())),
            "search" | "s" => Ok(Self::Search),
            "filter" | "f" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .map_or((rest, ""), |(f, v)| (f, v.trim()));
                Ok(Self::Filter(field.parse()?, value.to_owned()))
            }
            "reset" => Ok(Self::Reset),
            "page" => rest
                .parse::<usize>()
                .map(Self::Page)
                .map_err(|_| format!("expected a page number, got '{rest}'")),
            "next" | "n" => Ok(Self::Next),
            "prev" => Ok(Self::Prev),
            "options" | "o" => Ok(Self::Options),
            "help" | "?" | "" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

pub(crate) async fn run_browse(config: &AppConfig) -> anyhow::Result<()> {
    let (resolver, client) = build_backends(config)?;
    let debouncer = SuggestionDebouncer::new(
        Arc::clone(&resolver),
        Duration::from_millis(config.suggest_debounce_ms),
    );
    let monitor = StatusMonitor::new(
        Arc::clone(&client),
        Duration::from_millis(config.status_settle_ms),
    );
    let session = LiveSession::from_app_config(config, resolver, client);

    let mut suggestions_rx = debouncer.subscribe();
    let mut status_rx = monitor.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut dealer_name = String::new();
    let mut amount = String::new();

    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = match Input::parse(&line) {
                    Ok(input) => input,
                    Err(message) => {
                        println!("{message}");
                        continue;
                    }
                };
                match input {
                    Input::Quit => break,
                    Input::Help => println!("{HELP}"),
                    Input::Dealer(text) => {
                        monitor.clear();
                        debouncer.input(&text);
                        dealer_name = text;
                    }
                    Input::Pick(n) => {
                        let current = debouncer.current();
                        match current.dealers.get(n - 1) {
                            Some(dealer) => {
                                dealer_name.clone_from(&dealer.name);
                                debouncer.dismiss();
                                println!("selected {}", dealer.name);
                                monitor.select(dealer);
                            }
                            None => println!("no suggestion {n}"),
                        }
                    }
                    Input::Amount(raw) => amount = raw,
                    Input::Search => search(&session, &monitor, &dealer_name, &amount).await,
                    Input::Filter(field, value) => {
                        session.set_filter(field, &value);
                        show_page(&session);
                    }
                    Input::Reset => {
                        session.reset_filters();
                        show_page(&session);
                    }
                    Input::Page(n) => {
                        session.go_to_page(n);
                        show_page(&session);
                    }
                    Input::Next => {
                        session.go_to_page(session.visible_page().page + 1);
                        show_page(&session);
                    }
                    Input::Prev => {
                        session.go_to_page(session.visible_page().page.saturating_sub(1));
                        show_page(&session);
                    }
                    Input::Options => print!("{}", render::options(&session.options())),
                }
            }
            Ok(()) = suggestions_rx.changed() => {
                let suggestions = suggestions_rx.borrow_and_update().clone();
                print_suggestions(&suggestions.query, &suggestions.dealers);
            }
            Ok(()) = status_rx.changed() => {
                let status = *status_rx.borrow_and_update();
                println!("{}", render::status(status));
            }
        }
    }

    Ok(())
}

async fn search(
    session: &LiveSession,
    monitor: &StatusMonitor<Arc<CatalogClient>>,
    dealer: &str,
    amount: &str,
) {
    let status = monitor.status();
    if status.blocks_search() {
        println!("search unavailable: {}", render::status(status));
        return;
    }

    match session.search(dealer, amount).await {
        Ok(SearchOutcome::NoInventory(info)) => print!("{}", render::no_inventory(&info)),
        Ok(SearchOutcome::Results { .. }) => show_page(session),
        Ok(SearchOutcome::Superseded) => {}
        Err(e @ (SearchError::InvalidRequest(_) | SearchError::DealerNotFound(_))) => {
            println!("{e}");
        }
        Err(e) => {
            tracing::error!(error = %e, "search failed");
            println!("{e}");
        }
    }
}

fn show_page(session: &LiveSession) {
    print!(
        "{}",
        render::page_view(&session.visible_page(), session.qualified_amount())
    );
}

fn print_suggestions(query: &str, dealers: &[Dealer]) {
    if query.is_empty() {
        return;
    }
    if dealers.is_empty() {
        println!("no dealerships match '{query}'");
        return;
    }
    for (i, dealer) in dealers.iter().enumerate() {
        println!("  {}. {}", i + 1, dealer.name);
    }
}
