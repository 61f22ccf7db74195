use clap::{Parser, Subcommand};
use conclave_cli::{
    count_active_sessions, format_audit_entry, format_role_report, prune_sessions, recent_audit,
    resolve_role, revoke_sessions,
};
use conclave_config::RoleConfig;
use conclave_db::{PgPool, init_db_pool, run_migrations};
use dialoguer::Confirm;
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "conclave-cli")]
#[command(about = "Conclave CLI - Session administration tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Delete expired sessions from the store
    PruneSessions,
    /// Revoke every session belonging to an email address
    RevokeSessions {
        /// Email address whose sessions are revoked
        #[arg(short = 'e', long)]
        email: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Show the role and permissions a login would receive
    ResolveRole {
        /// Email address to classify
        email: String,
    },
    /// Print recent login and logout events
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: i64,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::ResolveRole { email } => handle_resolve_role(&email),
        Commands::Migrate => handle_migrate(&connect().await).await,
        Commands::PruneSessions => handle_prune(&connect().await).await,
        Commands::RevokeSessions { email, yes } => {
            handle_revoke(&connect().await, &email, yes).await
        }
        Commands::Audit { limit } => handle_audit(&connect().await, limit).await,
    }
}

async fn connect() -> PgPool {
    match init_db_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    }
}

fn handle_resolve_role(email: &str) {
    let (role, permissions) = resolve_role(&RoleConfig::from_env(), email);
    println!("{}", format_role_report(email, role, &permissions));
}

async fn handle_migrate(pool: &PgPool) {
    match run_migrations(pool).await {
        Ok(()) => println!("✅ Migrations applied"),
        Err(e) => {
            eprintln!("❌ Error applying migrations: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_prune(pool: &PgPool) {
    match prune_sessions(pool).await {
        Ok(deleted) => {
            println!("✅ Deleted {} expired session(s)", deleted);
            if let Ok(active) = count_active_sessions(pool).await {
                println!("   Active sessions remaining: {}", active);
            }
        }
        Err(e) => {
            eprintln!("❌ Error pruning sessions: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_revoke(pool: &PgPool, email: &str, yes: bool) {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Revoke all sessions for {email}?"))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmed {
            println!("Aborted");
            return;
        }
    }

    match revoke_sessions(pool, email).await {
        Ok(revoked) => {
            println!("✅ Revoked {} session(s) for {}", revoked, email);
            println!("   Running servers may honor cached copies until they expire");
        }
        Err(e) => {
            eprintln!("❌ Error revoking sessions: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_audit(pool: &PgPool, limit: i64) {
    match recent_audit(pool, limit.clamp(1, 500)).await {
        Ok(entries) if entries.is_empty() => println!("No audit entries"),
        Ok(entries) => {
            for entry in &entries {
                println!("{}", format_audit_entry(entry));
            }
        }
        Err(e) => {
            eprintln!("❌ Error reading audit log: {}", e);
            std::process::exit(1);
        }
    }
}
