use chrono::{Duration, TimeZone, Utc};
use clap::Subcommand;
use serde_json::json;
use valuenum_core::{Role, TokenSigner};

use super::load_config;

#[derive(Subcommand)]
pub enum TokenAction {
    /// Mint a bearer token signed with auth.jwt_secret
    Issue {
        /// Caller id stored with each calculation
        #[arg(long)]
        sub: String,
        #[arg(long, default_value = "user", value_parser = parse_role)]
        role: Role,
        /// Lifetime in minutes (defaults to auth.token_ttl_minutes)
        #[arg(long)]
        ttl_minutes: Option<u64>,
    },
    /// Check a token and print its claims
    Verify {
        token: String,
    },
}

fn parse_role(s: &str) -> Result<Role, String> {
    Role::parse(s).ok_or_else(|| format!("unknown role '{s}' (expected user or admin)"))
}

pub fn run(action: TokenAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let signer = TokenSigner::new(&config.auth.jwt_secret)?;

    match action {
        TokenAction::Issue {
            sub,
            role,
            ttl_minutes,
        } => {
            let minutes = ttl_minutes.unwrap_or(config.auth.token_ttl_minutes);
            let ttl = i64::try_from(minutes)
                .ok()
                .and_then(Duration::try_minutes)
                .ok_or_else(|| format!("ttl of {minutes} minutes is out of range"))?;
            let token = signer.issue(&sub, role, ttl)?;
            println!("{token}");
        }
        TokenAction::Verify { token } => {
            let claims = signer.verify(&token)?;
            let expires_at = Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .map(|t| t.to_rfc3339());
            let out = json!({
                "sub": claims.sub,
                "role": claims.role,
                "iat": claims.iat,
                "exp": claims.exp,
                "expires_at": expires_at,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
