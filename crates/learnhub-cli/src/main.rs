use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use learnhub_cli::admin::{NewAdmin, create_admin};
use learnhub_config::DatabaseConfig;

#[derive(Parser)]
#[command(name = "learnhub-cli")]
#[command(about = "LearnHub CLI - Administrative tools for LearnHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an active admin account
    CreateAdmin {
        /// Username (3-50 characters)
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Full name
        #[arg(short = 'n', long)]
        fullname: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = DatabaseConfig::from_env()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let pool = learnhub_db::init_db_pool(&config).await?;

    match cli.command {
        Commands::CreateAdmin {
            username,
            fullname,
            email,
            password,
        } => handle_create_admin(&pool, username, fullname, email, password).await,
    }
}

async fn handle_create_admin(
    pool: &sqlx::PgPool,
    username: Option<String>,
    fullname: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = match username {
        Some(v) => v,
        None => Input::<String>::new().with_prompt("Username").interact_text()?,
    };

    let fullname = match fullname {
        Some(v) => v,
        None => Input::<String>::new().with_prompt("Full name").interact_text()?,
    };

    let email = match email {
        Some(v) => v,
        None => Input::<String>::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(v) => v,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let admin = NewAdmin::new(&username, &fullname, &email, &password)?;
    let id = create_admin(pool, &admin).await?;

    println!("\n✅ Admin created successfully!");
    println!("   ID: {}", id);
    println!("   Email: {}", admin.email);
    println!("   Username: {}", admin.username);

    Ok(())
}
