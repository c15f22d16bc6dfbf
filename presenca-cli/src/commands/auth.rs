//! Sign in, sign out and session status.

use clap::{Args, Subcommand};
use std::io::{self, Write};

use crate::config::Config;
use crate::context::{Context, Refresh};
use crate::session::FileTokenStore;

#[derive(Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand)]
enum AuthSubcommand {
    /// Sign in with email and password
    Login {
        /// Account email (prompted if omitted)
        #[arg(long, short)]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Status,
}

impl AuthCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            AuthSubcommand::Login { email } => {
                let email = match email {
                    Some(email) => email.clone(),
                    None => prompt("Email: ")?,
                };
                let password = prompt("Password: ")?;

                let rt = tokio::runtime::Runtime::new()?;
                rt.block_on(login(config, &email, &password))
            }
            AuthSubcommand::Logout => {
                let session = FileTokenStore::open(&config.data_dir.value)?;
                if session.user().is_none() {
                    println!("Already logged out.");
                    return Ok(());
                }
                session.sign_out();
                println!("Logged out.");
                Ok(())
            }
            AuthSubcommand::Status => {
                let session = FileTokenStore::open(&config.data_dir.value)?;
                match session.user() {
                    Some(user) if session.is_signed_in() => {
                        println!("Signed in as {} <{}>", user.name, user.email);
                        if let Some(role) = user.role {
                            println!("Role: {}", role);
                        }
                    }
                    Some(user) => {
                        println!("Session for {} has expired.", user.email);
                    }
                    None => println!("Not signed in."),
                }
                if config.api.use_mock.value {
                    println!("Server: mock (offline demo data)");
                } else {
                    println!("Server: {}", config.api.base_url.value);
                }
                Ok(())
            }
        }
    }
}

async fn login(
    config: &Config,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::open(config, Refresh::Never).await?;
    let result = ctx.gateway.login(email, password).await;

    let outcome: Result<(), Box<dyn std::error::Error>> = match result {
        Ok(response) => {
            ctx.session.sign_in(&response);
            println!("Signed in as {} <{}>", response.user.name, response.user.email);
            Ok(())
        }
        Err(e) => Err(e.into()),
    };

    ctx.close().await;
    outcome
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
