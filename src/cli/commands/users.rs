use anyhow::Context;
use clap::Subcommand;

use crate::cli::utils::{output_rows, output_success};
use crate::cli::OutputFormat;
use crate::database::models::User;
use crate::database::Database;
use crate::types::Role;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create an account")]
    Create {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password, 8 or more characters")]
        password: String,
        #[arg(long, default_value = "user", help = "user, editor or admin")]
        role: Role,
    },

    #[command(about = "Change the role of an account")]
    SetRole {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "user, editor or admin")]
        role: Role,
    },

    #[command(about = "List accounts")]
    List,
}

pub async fn handle(cmd: UserCommands, db: &Database, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Create { username, email, password, role } => {
            let users = db.users.as_ref();
            if User::get_by_username(users, &username).await?.is_some() {
                anyhow::bail!("That username is taken");
            }
            if User::get_by_email(users, &email).await?.is_some() {
                anyhow::bail!("That email is taken");
            }

            let user = User::new(&email, &username, &password, role)?;
            let user = users.save(user).await.context("saving user")?;
            output_success(
                output_format,
                &format!("Created {} ({})", user.username, user.role),
                Some(serde_json::to_value(&user)?),
            )
        }
        UserCommands::SetRole { username, role } => {
            let mut user = User::get_by_username(db.users.as_ref(), &username)
                .await?
                .with_context(|| format!("no user named {}", username))?;
            user.role = role;
            let user = db.users.save(user).await?;
            output_success(
                output_format,
                &format!("{} is now {}", user.username, user.role),
                Some(serde_json::to_value(&user)?),
            )
        }
        UserCommands::List => {
            let users = db.users.all().await?;
            output_rows(output_format, &users, "No users", |user| {
                format!(
                    "{:>5}  {:<20} {:<32} {}",
                    user.id.unwrap_or_default(),
                    user.username,
                    user.email,
                    user.role
                )
            })
        }
    }
}
