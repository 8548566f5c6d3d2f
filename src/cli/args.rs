use clap::Parser;
use std::env;
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "REST backend for users and blog posts backed by SQLite",
    long_about = "Serves CRUD and paginated listing endpoints for users and their blog posts.\n\nEnvironment:\n  BLOG_API_DATABASE     SQLite database file\n  BLOG_API_LISTEN       REST API listen address\n  BLOG_API_LOG_FILE     Extra log file\n  RUST_LOG              Log filter (default info)\n"
)]
pub struct Cli {
    #[arg(
        long,
        env = "BLOG_API_DATABASE",
        default_value = "database/data.sqlite",
        value_name = "PATH",
        help = "SQLite database file"
    )]
    pub database: String,

    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted state (delete the SQLite database) before starting"
    )]
    pub reset: bool,

    #[arg(
        long = "log-file",
        env = "BLOG_API_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[arg(
        long = "api-listen",
        env = "BLOG_API_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:3000",
        help = "REST API listen address (host:port)"
    )]
    pub api_listen: SocketAddr,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    if dotenvy::from_filename(&dotenv_path).is_ok() {
        eprintln!("Loaded env from {}", dotenv_path);
    }
    Cli::parse()
}
