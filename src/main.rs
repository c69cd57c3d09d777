// Command-line entry point.
// Opens the cache session, reports on each account in order, then persists the cache.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use github_vanity::Result;
use github_vanity::cache::CacheStore;
use github_vanity::config::Settings;
use github_vanity::fanout::DEFAULT_MAX_CONNECTIONS;
use github_vanity::github::GitHubClient;
use github_vanity::logging::init_logging;
use github_vanity::vanity::Vanity;

#[derive(Parser)]
#[command(name = "github-vanity")]
#[command(version)]
#[command(about = "List the followers, stargazers and watchers of GitHub accounts")]
#[command(after_long_help = r#"ENVIRONMENT VARIABLES
    GITHUB_VANITY_TOKEN    GitHub token sent as "Authorization: token <value>"
    XDG_CACHE_HOME         Cache root (default: ~/.cache); the cache lives in github-vanity/
"#)]
struct Cli {
    /// Accounts to report on
    #[arg(required = true, value_name = "ACCOUNT")]
    accounts: Vec<String>,

    /// Leave USER out of every list (repeatable)
    #[arg(long, value_name = "USER")]
    ignore: Vec<String>,

    /// Maximum concurrent API requests
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    max_connections: usize,

    /// Trace HTTP requests and responses to stderr
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.accounts, cli.ignore, cli.max_connections)?;
    let dir = settings.cache_dir.clone();
    let mut store = tokio::task::spawn_blocking(move || -> Result<CacheStore> {
        let mut store = CacheStore::new(dir);
        store.open()?;
        Ok(store)
    })
    .await??;

    let result = report(&settings, &store).await;
    let closed = store.close();
    result.and(closed)
}

async fn report(settings: &Settings, store: &CacheStore) -> Result<()> {
    let client = GitHubClient::new(settings.token.as_deref(), store.shared())?;
    let vanity = Vanity::new(client, settings.max_connections);

    let mut stdout = io::stdout();
    for account in &settings.accounts {
        vanity.dump(account, &settings.ignored, &mut stdout).await?;
    }
    Ok(())
}
