use pullsearch_client::{PullPushClient, SearchSession};
use pullsearch_core::{AppConfig, SearchFilters};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let query = std::env::args().nth(1).unwrap_or_else(|| "rust".to_string());
    println!("=== PullPush Live Search: {:?} ===\n", query);

    let config = AppConfig::load()?;
    let client = PullPushClient::from_config(&config)?;
    let mut session = SearchSession::new(client, config.default_page_size);

    let mut updates = session.subscribe();
    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            println!(
                "  [update] loading={} held={}",
                state.is_loading(),
                state.results().len()
            );
        }
    });

    let filters = SearchFilters {
        query,
        ..Default::default()
    };
    println!("Search: {:?}", session.search(filters).await);
    println!("Load more: {:?}", session.load_more().await);

    let state = session.state();
    if let Some(error) = state.error() {
        println!("Error: {}", error);
    }
    println!("Request URL: {}", state.api_url().unwrap_or("-"));
    println!(
        "Holding {} of {:?} results",
        state.results().len(),
        state.total_results()
    );
    for item in state.results().iter().take(10) {
        println!("  r/{} u/{}: {}", item.subreddit, item.author, item.title);
    }

    let metrics = session.backend().get_metrics().await;
    println!("\n{}", metrics.summary());

    drop(session);
    watcher.await?;
    Ok(())
}
