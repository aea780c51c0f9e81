// CLI module for administrative operations requiring server access

use clap::{Parser, Subcommand};

use crate::app_data::AppData;
use crate::auth::RoleKind;

/// Stockroom CLI for administrative operations
#[derive(Parser)]
#[command(name = "stockroom")]
#[command(about = "Stockroom inventory backend", long_about = None)]
pub struct Cli {
    /// Without a subcommand the server starts as if `serve` was given
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Create a user without going through the API
    ///
    /// Useful for the first admin account, before any token can be issued.
    CreateUser {
        /// Username for the new account
        username: String,

        /// Plaintext password, hashed before storage
        #[arg(long)]
        password: String,

        /// Role name (SYSTEM_ADMIN, LOCATION_ADMIN or LOCATION_OPERATOR)
        #[arg(long)]
        role: String,

        /// Age, if known
        #[arg(long)]
        age: Option<i32>,
    },

    /// Delete a user by username
    DeleteUser {
        /// Username of the account to delete
        username: String,
    },
}

/// Execute an administrative CLI command.
///
/// `Serve` never reaches this function; main dispatches it to the server
/// loop directly.
pub async fn execute_command(
    command: Commands,
    app_data: &AppData,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve => {}
        Commands::CreateUser {
            username,
            password,
            role,
            age,
        } => {
            let kind = RoleKind::parse(&role)
                .ok_or_else(|| format!("Unknown role: {}", role))?;

            let role_row = app_data
                .role_store
                .find_by_name(kind)
                .await?
                .ok_or_else(|| format!("Role not present in database: {}", role))?;

            let created = app_data
                .user_store
                .create(&username, &password, age, &[role_row.id])
                .await?;

            println!(
                "Created user {} (id {}) with role {}",
                created.user.username, created.user.id, role_row.name
            );
        }
        Commands::DeleteUser { username } => {
            let user = app_data
                .user_store
                .find_by_username_with_roles(&username)
                .await?
                .ok_or_else(|| format!("No such user: {}", username))?;

            app_data.user_store.delete(user.user.id).await?;

            println!("Deleted user {} (id {})", username, user.user.id);
        }
    }

    Ok(())
}
