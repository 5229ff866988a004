//! `wayfinder search`: place suggestions.
//!
//! One-shot mode prints the suggestions for a single query. Interactive mode
//! reads queries line by line from stdin and feeds them through the
//! debounced pipeline, printing results as they are published.

use tokio::io::{AsyncBufReadExt, BufReader};
use wayfinder::geo::Coordinate;
use wayfinder::search::DebouncedSearch;

use super::common::print_candidates;
use crate::error::CliError;
use crate::runner::{CliRunner, RunOptions};

pub async fn run(
    options: RunOptions,
    query: Option<&str>,
    near: Option<Coordinate>,
) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("search")?;
    runner.require_token()?;

    let proxy = runner.search_proxy()?;
    match query {
        Some(query) => {
            let candidates = proxy.search(query, near).await;
            println!("Results for '{}':", query);
            print_candidates(&candidates);
            Ok(())
        }
        None => {
            let debounce = runner.config().debounce();
            let search = DebouncedSearch::spawn(proxy, debounce);
            interactive(&search, near).await;
            Ok(())
        }
    }
}

async fn interactive(search: &DebouncedSearch, near: Option<Coordinate>) {
    println!("Type a query and press enter; Ctrl+D to quit.");

    let mut results = search.results();
    let printer = tokio::spawn(async move {
        while results.changed().await.is_ok() {
            let latest = results.borrow_and_update().clone();
            println!("Results for '{}':", latest.query);
            print_candidates(&latest.candidates);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        search.submit(line, near);
    }

    search.close();
    printer.abort();
}
