use ajax::commands::{self, Config, Verb, call_options};
use anyhow::Result;
use clap::Parser;

/// ajax - JSON HTTP client
///
/// Send JSON requests with a per-call deadline and print the decoded response.
///
/// Examples:
///   ajax --base-url https://jsonplaceholder.typicode.com list /posts?_limit=5
///   ajax post https://api.example.com/items --data '{"name":"x"}'
#[derive(Parser, Debug)]
#[command(author, version = env!("AJAX_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base address for relative paths (also via AJAX_BASE_URL)
    #[arg(long = "base-url", env = "AJAX_BASE_URL", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Default request deadline in milliseconds (also via AJAX_TIMEOUT_MS)
    #[arg(
        long = "timeout",
        env = "AJAX_TIMEOUT_MS",
        value_name = "MS",
        global = true
    )]
    pub timeout_ms: Option<u64>,

    /// Default header sent with every request, as "Name: value"
    #[arg(short = 'H', long = "header", value_name = "HEADER", global = true)]
    pub headers: Vec<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Fetch a JSON list and print "id: title" for each record
    List(PathArgs),

    /// Send a GET request
    Get(PathArgs),

    /// Send a DELETE request
    Delete(PathArgs),

    /// Send a POST request with a JSON body
    Post(BodyArgs),

    /// Send a PUT request with a JSON body
    Put(BodyArgs),
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Path relative to the base address, or an absolute http(s) URL
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Deadline for this call only, in milliseconds
    #[arg(long = "call-timeout", value_name = "MS")]
    pub call_timeout_ms: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct BodyArgs {
    #[command(flatten)]
    pub target: PathArgs,

    /// JSON payload
    #[arg(long, short = 'd', value_name = "JSON")]
    pub data: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = Config {
        base_url: cli.base_url,
        timeout_ms: cli.timeout_ms,
        headers: cli.headers,
    };
    let client = config.client()?;

    match cli.command {
        Commands::List(args) => {
            let options = call_options(args.call_timeout_ms)?;
            commands::list(&client, &args.path, options).await?
        }
        Commands::Get(args) => {
            let options = call_options(args.call_timeout_ms)?;
            commands::request(&client, Verb::Get, &args.path, None, options).await?
        }
        Commands::Delete(args) => {
            let options = call_options(args.call_timeout_ms)?;
            commands::request(&client, Verb::Delete, &args.path, None, options).await?
        }
        Commands::Post(args) => {
            let options = call_options(args.target.call_timeout_ms)?;
            commands::request(&client, Verb::Post, &args.target.path, Some(&args.data), options)
                .await?
        }
        Commands::Put(args) => {
            let options = call_options(args.target.call_timeout_ms)?;
            commands::request(&client, Verb::Put, &args.target.path, Some(&args.data), options)
                .await?
        }
    }
    Ok(())
}
