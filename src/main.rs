use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tunerelay::{
    config::{self, Settings},
    error,
    relay::{self, StreamMode},
    server::{self, AppState},
    warning,
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
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Address to bind, overrides SERVER_ADDRESS
    #[clap(long)]
    pub address: Option<String>,

    /// How audio is delivered: `redirect` or `relay`, overrides STREAM_MODE
    #[clap(long, value_parser = relay::parse_stream_mode)]
    pub stream_mode: Option<StreamMode>,

    /// Keep sessions in memory instead of signed cookies
    #[clap(long)]
    pub memory_sessions: bool,

    /// Open the login page in the default browser once the server is up
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(opt) => serve(opt).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

async fn serve(opt: ServeOptions) {
    let mut settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    if let Some(address) = opt.address {
        settings.server_address = address;
    }
    if let Some(mode) = opt.stream_mode {
        settings.stream_mode = mode;
    }

    let listener = match server::bind(&settings.server_address).await {
        Ok(listener) => listener,
        Err(e) => error!("Cannot bind {}: {}", settings.server_address, e),
    };

    if opt.open {
        let login_url = match (&settings.public_url, listener.local_addr()) {
            (Some(base), _) => format!("{}/login", base.trim_end_matches('/')),
            (None, Ok(addr)) => format!("http://{addr}/login"),
            (None, Err(_)) => format!("http://{}/login", settings.server_address),
        };
        tokio::task::spawn_blocking(move || {
            if webbrowser::open(&login_url).is_err() {
                warning!(
                    "Failed to open browser. Please navigate to the following URL manually:\n{}",
                    login_url
                )
            }
        });
    }

    let state = Arc::new(AppState::from_settings(settings, opt.memory_sessions));
    if let Err(e) = server::serve(listener, state).await {
        error!("Server stopped: {}", e);
    }
}
