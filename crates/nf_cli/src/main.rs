use anyhow::Context;
use clap::Parser;
use nf_core::ArticleStore;
use nf_crawler::{CrawlStop, CrawlerConfig, HttpFetcher, NewsCrawler};
use nf_storage::StorageKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

mod logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Finance news crawler", long_about = None)]
pub struct Cli {
    /// Article store backend: memory or sqlite
    #[arg(long, env = "NF_STORAGE", default_value = "memory")]
    storage: StorageKind,
    /// SQLite database file
    #[arg(long, env = "NF_DATABASE_PATH", default_value = "news_articles.db")]
    database_path: PathBuf,
    /// User-Agent sent with every request
    #[arg(long, env = "USER_AGENT", default_value = nf_crawler::config::DEFAULT_USER_AGENT)]
    user_agent: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP trigger and search API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
        #[arg(long, env = "PORT", default_value_t = 8888)]
        port: u16,
    },
    /// Crawl listing pages once and exit
    Crawl {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=10))]
        pages: u32,
    },
    /// Search stored articles by keyword
    Search { keyword: String },
}

fn build_crawler(cli: &Cli, store: Arc<dyn ArticleStore>) -> NewsCrawler {
    let config = CrawlerConfig {
        user_agent: cli.user_agent.clone(),
        ..CrawlerConfig::default()
    };
    let fetcher = Arc::new(HttpFetcher::new(config.user_agent.clone()));
    NewsCrawler::new(config, fetcher, store)
}

async fn serve(crawler: NewsCrawler, store: Arc<dyn ArticleStore>, bind: &str, port: u16) -> anyhow::Result<()> {
    let app = nf_web::create_app(nf_web::AppState {
        crawler: Arc::new(crawler),
        store,
    });
    let addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("🚀 Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutting down server");
        })
        .await?;
    Ok(())
}

async fn crawl(crawler: NewsCrawler, pages: u32) -> anyhow::Result<()> {
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current item");
            let _ = cancel_tx.send(true);
        }
    });

    let report = crawler.crawl_with_cancel(pages, cancel_rx).await;
    match report.stop {
        Some(CrawlStop::PageFailed { page, error }) => {
            return Err(anyhow::Error::new(error).context(format!("crawl stopped at page {}", page)));
        }
        Some(CrawlStop::EmptyListing { page }) => warn!(page, "Crawl ended early on an empty listing page"),
        Some(CrawlStop::Cancelled { page }) => warn!(page, "Crawl cancelled"),
        None => {}
    }
    println!(
        "Collected {} articles ({} duplicates, {} failed)",
        report.articles.len(),
        report.duplicates,
        report.failed_items
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    let store = nf_storage::create_storage(cli.storage, &cli.database_path).await?;
    info!("✨ Storage initialized successfully (using {:?})", cli.storage);

    match &cli.command {
        Commands::Serve { bind, port } => {
            let crawler = build_crawler(&cli, store.clone());
            serve(crawler, store, bind, *port).await?;
        }
        Commands::Crawl { pages } => {
            let crawler = build_crawler(&cli, store);
            crawl(crawler, *pages).await?;
        }
        Commands::Search { keyword } => {
            let articles = nf_crawler::search_articles(store.as_ref(), keyword).await?;
            println!("{}", serde_json::to_string_pretty(&articles)?);
        }
    }

    Ok(())
}
