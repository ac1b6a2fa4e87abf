use clap::{Parser, Subcommand};
use clearance_cli::admin::{activate_session, create_session, create_staff_user, list_sessions};
use clearance_cli::seeder::{self, DEFAULT_PASSWORD, SeedConfig};
use clearance_config::DatabaseConfig;
use clearance_db::{init_db_pool, run_migrations};
use clearance_models::{SessionId, roles};
use dialoguer::{Input, Password, Select};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "clearance-cli")]
#[command(about = "Clearance CLI - Administrative tools for the clearance workflow", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a staff account (admin or staff role)
    CreateStaff {
        /// Login name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Full name
        #[arg(short = 'n', long)]
        full_name: Option<String>,

        /// Role: admin or staff
        #[arg(short = 'r', long)]
        role: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Create a clearance session
    CreateSession {
        /// Session name, e.g. 2024/2025
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Make it the active session
        #[arg(short = 'a', long)]
        activate: bool,
    },
    /// Make a session the single active one
    ActivateSession {
        /// Session ID
        id: i64,
    },
    /// List clearance sessions
    ListSessions,
    /// Seed departments, approvers, clearance items and students
    Seed {
        /// Number of departments (each gets one approver and one item)
        #[arg(short = 'd', long, default_value = "3")]
        departments: usize,

        /// Number of students
        #[arg(short = 's', long, default_value = "25")]
        students: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
    run_migrations(&pool).await?;

    let result = match cli.command {
        Commands::CreateStaff {
            username,
            full_name,
            role,
            password,
        } => handle_create_staff(&pool, username, full_name, role, password).await,
        Commands::CreateSession { name, activate } => {
            handle_create_session(&pool, name, activate).await
        }
        Commands::ActivateSession { id } => {
            activate_session(&pool, SessionId::new(id))
                .await
                .map(|session| println!("✅ Session '{}' ({}) is now active", session.name, session.id))
        }
        Commands::ListSessions => handle_list_sessions(&pool).await,
        Commands::Seed {
            departments,
            students,
        } => seeder::seed_all(
            &pool,
            SeedConfig {
                departments,
                students,
            },
        )
        .await
        .map(|_| println!("   Approver password: {}", DEFAULT_PASSWORD)),
    };

    if let Err(e) = result {
        eprintln!("\n❌ {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn handle_create_staff(
    pool: &sqlx::PgPool,
    username: Option<String>,
    full_name: Option<String>,
    role: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let full_name = match full_name {
        Some(full_name) => full_name,
        None => Input::new().with_prompt("Full name").interact_text()?,
    };

    let role = match role {
        Some(role) => role,
        None => {
            let selection = Select::new()
                .with_prompt("Role")
                .items(roles::STAFF_ROLES)
                .default(1)
                .interact()?;
            roles::STAFF_ROLES[selection].to_string()
        }
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let user = create_staff_user(pool, &username, &full_name, &role, &password).await?;

    println!("\n✅ Staff user created successfully!");
    println!("   ID: {}", user.id);
    println!("   Username: {}", user.username);
    println!("   Role: {}", role);
    Ok(())
}

async fn handle_create_session(
    pool: &sqlx::PgPool,
    name: Option<String>,
    activate: bool,
) -> anyhow::Result<()> {
    let name = match name {
        Some(name) => name,
        None => Input::new().with_prompt("Session name").interact_text()?,
    };

    let session = create_session(pool, &name, activate).await?;

    println!("\n✅ Session '{}' created with ID {}", session.name, session.id);
    if session.is_active {
        println!("   It is now the active session");
    }
    Ok(())
}

async fn handle_list_sessions(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let sessions = list_sessions(pool).await?;

    if sessions.is_empty() {
        println!("No clearance sessions. Run `create-session` first.");
        return Ok(());
    }

    for session in sessions {
        let marker = if session.is_active { "*" } else { " " };
        println!("{} {:>4}  {}", marker, session.id, session.name);
    }
    Ok(())
}
