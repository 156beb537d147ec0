use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use portfolio::auth::{PasswordHasher, TokenSigner, register_admin};
use portfolio::config::{DEFAULT_CONTACT_DAILY_LIMIT, ServerConfig, database_path};
use portfolio::error::Error;
use portfolio::media::{Cloudinary, DEFAULT_FOLDER, MediaHost, NoMediaHost};
use portfolio::notify::TelegramNotifier;
use portfolio::server::{AppState, create_router};
use portfolio::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "portfolio")]
#[command(about = "Personal portfolio backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve(ServeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind to
    #[arg(long, short, env = "PORT", default_value = "8080")]
    port: u16,

    /// SQLite database path (a `sqlite://` prefix is accepted)
    #[arg(long, env = "DATABASE_URL", default_value = "./data/portfolio.db")]
    database: String,

    /// Secret used to sign admin bearer tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Telegram bot token used for contact notifications
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    telegram_bot_token: String,

    /// Telegram chat that receives contact notifications
    #[arg(long, env = "TELEGRAM_ADMIN_CHAT_ID")]
    telegram_admin_chat_id: String,

    /// Cloudinary credentials, `cloudinary://<key>:<secret>@<cloud>`
    #[arg(long, env = "CLOUDINARY_URL", hide_env_values = true)]
    cloudinary_url: Option<String>,

    /// Cloudinary folder for uploaded images
    #[arg(long, env = "MEDIA_FOLDER", default_value = DEFAULT_FOLDER)]
    media_folder: String,

    /// Expose `POST /signup`
    #[arg(long, env = "SHOW_SIGNUP")]
    show_signup: bool,

    /// Contact requests allowed per IP per day
    #[arg(long, env = "CONTACT_DAILY_LIMIT", default_value_t = DEFAULT_CONTACT_DAILY_LIMIT)]
    contact_daily_limit: u32,
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Create an admin account directly in the database
    Create {
        /// SQLite database path (a `sqlite://` prefix is accepted)
        #[arg(long, env = "DATABASE_URL", default_value = "./data/portfolio.db")]
        database: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            database: database_path(&args.database),
            jwt_secret: args.jwt_secret,
            telegram_bot_token: args.telegram_bot_token,
            telegram_admin_chat_id: args.telegram_admin_chat_id,
            cloudinary_url: args.cloudinary_url.filter(|url| !url.trim().is_empty()),
            media_folder: args.media_folder,
            signup_enabled: args.show_signup,
            contact_daily_limit: args.contact_daily_limit,
        }
    }
}

fn open_store(path: &Path) -> anyhow::Result<SqliteStore> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let store = SqliteStore::new(path)?;
    store.initialize()?;
    Ok(store)
}

fn run_admin_create(
    database: PathBuf,
    username: String,
    email: String,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => inquire::Password::new("Password:")
            .with_validator(|input: &str| {
                if input.is_empty() {
                    Err("Password cannot be empty".into())
                } else {
                    Ok(inquire::validator::Validation::Valid)
                }
            })
            .prompt()?,
    };

    let store = open_store(&database)?;
    let admin = match register_admin(&store, &PasswordHasher::new(), &username, &email, &password)
    {
        Ok(admin) => admin,
        Err(Error::AlreadyExists) => {
            bail!("An admin with username '{username}' or email '{email}' already exists")
        }
        Err(e) => return Err(e.into()),
    };

    println!("Created admin '{}' <{}>", admin.username, admin.email);
    Ok(())
}

async fn run_serve(config: ServerConfig) -> anyhow::Result<()> {
    let store = open_store(&config.database)?;
    info!("Database ready at {}", config.database.display());

    let media: Arc<dyn MediaHost> = match config.cloudinary_url.as_deref() {
        Some(url) => Arc::new(Cloudinary::from_url(url, config.media_folder.clone())?),
        None => {
            warn!("CLOUDINARY_URL not set, image uploads are disabled");
            Arc::new(NoMediaHost)
        }
    };

    let notifier = TelegramNotifier::new(
        config.telegram_bot_token.clone(),
        config.telegram_admin_chat_id.clone(),
    )?;

    let state = Arc::new(
        AppState::new(
            Arc::new(store),
            media,
            Arc::new(notifier),
            TokenSigner::new(&config.jwt_secret)?,
        )
        .with_signup(config.signup_enabled)
        .with_contact_daily_limit(config.contact_daily_limit),
    );

    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("portfolio=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Create {
                database,
                username,
                email,
                password,
            } => {
                run_admin_create(database_path(&database), username, email, password)?;
            }
        },
        Commands::Serve(args) => {
            run_serve(args.into()).await?;
        }
    }

    Ok(())
}
