use std::{sync::Arc, time::Duration};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};

use sporlapi::{
    config::{self, Config},
    error, info, server,
    spotify::{CatalogApi, SpotifyClient, TokenCache},
    success,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve(ServeOptions),

    /// Check the Spotify client credentials and exit
    Auth,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct ServeOptions {
    /// Port to listen on, overrides PORT
    #[clap(long)]
    pub port: Option<u16>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    for path in config::load_env() {
        info!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    let mut config = Config::from_env();

    match cli.command.unwrap_or(Command::Serve(ServeOptions::default())) {
        Command::Serve(opt) => {
            if let Some(port) = opt.port {
                config.port = port;
            }
            if let Err(e) = server::start_api_server(config).await {
                error!("Server stopped with an error. Err: {}", e);
            }
        }
        Command::Auth => check_auth(config).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

/// Runs the token exchange and the category smoke test from the terminal.
async fn check_auth(config: Config) {
    if !config.spotify_configured() {
        error!("SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET must be set");
    }

    let api: Arc<dyn CatalogApi> = Arc::new(SpotifyClient::new(&config));
    let tokens = TokenCache::new(Arc::clone(&api));

    let pb = ProgressBar::new_spinner();
    pb.set_message("Requesting Spotify access token...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let token = match tokens.get_valid_token().await {
        Ok(t) => t,
        Err(e) => {
            pb.finish_and_clear();
            error!("{}", e);
        }
    };

    pb.set_message("Calling the catalog with the new token...");
    let result = api.browse_categories(&token, 1).await;
    pb.finish_and_clear();

    match result {
        Ok(_) => success!("Spotify credentials are working"),
        Err(e) => error!("Token obtained but the catalog call failed: {}", e),
    }
}
