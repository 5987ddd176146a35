use clap::Parser;
use quickopen::cli::{Cli, Commands};
use quickopen::commands;
use quickopen::record::SearchResultItem;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "QUICKOPEN_LOG";

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search {
            query,
            snapshot,
            strategy,
            json,
        }) => {
            let state = commands::run_search(&query, snapshot, strategy.map(Into::into))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&state.results)?);
            } else {
                println!("({})", state.count());
                for item in &state.results {
                    println!("{}", format_result(item));
                }
            }
            Ok(())
        }
        Some(Commands::Sources { snapshot }) => {
            let counts = commands::sources(snapshot)?;
            println!("tabs: {}", counts.tabs);
            println!("bookmarks: {}", counts.bookmarks);
            println!("history: {}", counts.history);
            Ok(())
        }
        #[cfg(feature = "mcp")]
        Some(Commands::Serve) => tokio::runtime::Runtime::new()?.block_on(quickopen::mcp::serve()),
        None => {
            Cli::parse_from(["quickopen", "--help"]);
            Ok(())
        }
    }
}

/// Log to stderr so stdout stays parseable.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn format_result(item: &SearchResultItem) -> String {
    let title = item.title.as_deref().unwrap_or(&item.url);
    format!("{:<8} {:>6.1}  {}  {}", item.kind.as_str(), item.score, title, item.original_url)
}
