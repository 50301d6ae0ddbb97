use std::env;
use std::error::Error;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use linechat::config::{self, AppConfig};
use linechat::network::sign_up;
use linechat::ui::TerminalApp;
use linechat::{ChatClient, ChatError};

const PASSWORD_ENV: &str = "LINECHAT_PASSWORD";

#[derive(Parser)]
#[command(name = "linechat", version, about = "Terminal client for the line-protocol chat server")]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Server host, overrides config and environment
    #[arg(long)]
    host: Option<String>,
    /// Server port, overrides config and environment
    #[arg(long)]
    port: Option<u16>,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Sign in and open the chat
    Login {
        username: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Register a new account
    Signup {
        username: String,
        first_name: String,
        last_name: String,
        #[arg(long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    // 1. Đọc tham số dòng lệnh và cấu hình
    let cli = Cli::parse();
    let app_config = resolve_config(&cli);
    let addr = app_config.server_addr();

    // 2. Đăng nhập rồi chạy UI, hoặc chỉ đăng ký tài khoản
    match cli.mode {
        Mode::Login { username, password } => {
            let password = password_or_env(password)?;
            let (client, event_rx) = ChatClient::login(&addr, &username, &password).await?;
            TerminalApp::new(client, event_rx).run().await?;
        }
        Mode::Signup {
            username,
            first_name,
            last_name,
            password,
        } => {
            let password = password_or_env(password)?;
            let confirmation = sign_up(&addr, &username, &password, &first_name, &last_name).await?;
            println!("{confirmation}");
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> AppConfig {
    let mut app_config = config::load_config(&cli.config).with_env_overrides();
    if let Some(host) = &cli.host {
        app_config.server_host = host.clone();
    }
    if let Some(port) = cli.port {
        app_config.server_port = port;
    }
    log::info!("Using chat server {}", app_config.server_addr());
    app_config
}

fn password_or_env(password: Option<String>) -> Result<String, ChatError> {
    password
        .or_else(|| env::var(PASSWORD_ENV).ok())
        .filter(|p| !p.is_empty())
        .ok_or(ChatError::InvalidRequest("password required (--password or LINECHAT_PASSWORD)"))
}
