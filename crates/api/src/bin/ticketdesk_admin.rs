//! Admin account provisioning CLI.
//!
//! Usage:
//! ```bash
//! # Create an admin (password may also come from ADMIN_PASSWORD)
//! ticketdesk-admin create --username ops --email ops@example.com \
//!     --full-name "Ops Team" --role event_manager --password '...'
//!
//! # Turn on two-factor with a hex-encoded TOTP secret
//! ticketdesk-admin enable-2fa --username ops --secret 3132333435363738393031323334353637383930
//!
//! # Deactivate an account and end its sessions
//! ticketdesk-admin deactivate --username ops
//!
//! # Delete expired or invalidated sessions and spent two-factor challenges
//! ticketdesk-admin purge-sessions
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ticketdesk_api::auth::password::{
    hash_password, validate_password_strength, MIN_PASSWORD_LENGTH,
};
use ticketdesk_core::audit::{action_types, resource_types};
use ticketdesk_core::contact::{validate_email, validate_username};
use ticketdesk_core::roles::{is_known_role, ALL_ROLES, ROLE_EVENT_MANAGER};
use ticketdesk_core::two_factor::decode_secret;
use ticketdesk_core::types::DbId;
use ticketdesk_db::models::activity::CreateActivity;
use ticketdesk_db::models::admin::{Admin, CreateAdmin};
use ticketdesk_db::repositories::{
    ActivityRepo, AdminRepo, RoleRepo, SessionRepo, TwoFactorChallengeRepo,
};
use ticketdesk_db::DbPool;

#[derive(Parser)]
#[command(
    name = "ticketdesk-admin",
    about = "Provision and manage ticketdesk admin accounts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new admin account
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: String,
        /// Role name (super_admin, event_manager, support)
        #[arg(long, default_value = ROLE_EVENT_MANAGER)]
        role: String,
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Enable two-factor authentication with a hex-encoded TOTP secret
    #[command(name = "enable-2fa")]
    EnableTwoFactor {
        #[arg(long)]
        username: String,
        #[arg(long)]
        secret: String,
    },

    /// Disable two-factor authentication
    #[command(name = "disable-2fa")]
    DisableTwoFactor {
        #[arg(long)]
        username: String,
    },

    /// Deactivate an account and invalidate its sessions
    Deactivate {
        #[arg(long)]
        username: String,
    },

    /// Delete expired or invalidated sessions and spent two-factor challenges
    PurgeSessions,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticketdesk_admin=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let database_url = cli
        .database_url
        .context("DATABASE_URL must be set or passed with --database-url")?;
    let pool = ticketdesk_db::create_pool(&database_url, 2)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Command::Create {
            username,
            email,
            full_name,
            role,
            password,
        } => create_admin(&pool, username, email, full_name, &role, &password).await,
        Command::EnableTwoFactor { username, secret } => {
            decode_secret(&secret)?;
            let admin = find_admin(&pool, &username).await?;
            AdminRepo::enable_two_factor(&pool, admin.id, secret.trim()).await?;
            record(&pool, admin.id, "Two-factor enabled via CLI").await?;
            tracing::info!(admin_id = admin.id, "Two-factor enabled");
            Ok(())
        }
        Command::DisableTwoFactor { username } => {
            let admin = find_admin(&pool, &username).await?;
            AdminRepo::disable_two_factor(&pool, admin.id).await?;
            record(&pool, admin.id, "Two-factor disabled via CLI").await?;
            tracing::info!(admin_id = admin.id, "Two-factor disabled");
            Ok(())
        }
        Command::Deactivate { username } => {
            let admin = find_admin(&pool, &username).await?;
            AdminRepo::set_active(&pool, admin.id, false).await?;
            let ended = SessionRepo::invalidate_all_for_admin(&pool, admin.id).await?;
            record(&pool, admin.id, "Deactivated via CLI").await?;
            tracing::info!(admin_id = admin.id, sessions_ended = ended, "Admin deactivated");
            Ok(())
        }
        Command::PurgeSessions => {
            let purged = SessionRepo::purge_expired(&pool).await?;
            let challenges = TwoFactorChallengeRepo::purge_expired(&pool).await?;
            tracing::info!(purged, challenges, "Purged sessions and two-factor challenges");
            Ok(())
        }
    }
}

async fn create_admin(
    pool: &DbPool,
    username: String,
    email: String,
    full_name: String,
    role: &str,
    password: &str,
) -> Result<()> {
    validate_username(&username)?;
    validate_email(&email)?;
    if full_name.trim().is_empty() {
        bail!("Full name must not be empty");
    }
    validate_password_strength(password, MIN_PASSWORD_LENGTH).map_err(anyhow::Error::msg)?;

    if !is_known_role(role) {
        bail!("Unknown role '{role}'. Known roles: {}", ALL_ROLES.join(", "));
    }
    let role = RoleRepo::find_by_name(pool, role)
        .await?
        .with_context(|| format!("Role '{role}' is missing from admin_roles; run migrations"))?;

    let password_hash = hash_password(password)?;
    let admin = AdminRepo::create(
        pool,
        &CreateAdmin {
            username,
            password_hash,
            email,
            full_name: full_name.trim().to_string(),
            role_id: role.id,
        },
    )
    .await
    .context("Failed to insert admin")?;

    ActivityRepo::create(
        pool,
        &CreateActivity {
            admin_id: admin.id,
            action_type: action_types::ADMIN_CREATE.to_string(),
            resource_type: resource_types::ADMIN.to_string(),
            details: Some(format!("Created via CLI with role {}", role.name)),
            ip_address: None,
        },
    )
    .await?;

    tracing::info!(admin_id = admin.id, username = %admin.username, role = %role.name, "Admin created");
    Ok(())
}

async fn find_admin(pool: &DbPool, username: &str) -> Result<Admin> {
    AdminRepo::find_by_username(pool, username)
        .await?
        .with_context(|| format!("No admin named '{username}'"))
}

async fn record(pool: &DbPool, admin_id: DbId, details: &str) -> Result<()> {
    ActivityRepo::create(
        pool,
        &CreateActivity {
            admin_id,
            action_type: action_types::ADMIN_UPDATE.to_string(),
            resource_type: resource_types::ADMIN.to_string(),
            details: Some(details.to_string()),
            ip_address: None,
        },
    )
    .await?;
    Ok(())
}
