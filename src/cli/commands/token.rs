use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::{utils::output_success, OutputFormat};
use crate::config::config;

pub fn handle(
    username: &str,
    admin: bool,
    hours: Option<u64>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let security = &config().security;
    let expiry_hours = hours.unwrap_or(security.jwt_expiry_hours);

    let claims = Claims::new(username, admin, expiry_hours);
    let token = generate_jwt(&claims, &security.jwt_secret)?;

    match output_format {
        // Bare token on stdout so it can be captured by a shell
        OutputFormat::Text => println!("{}", token),
        OutputFormat::Json => output_success(
            output_format,
            &format!("Token issued for {}", username),
            Some(json!({
                "token": token,
                "username": username,
                "is_admin": admin,
                "expires_at": claims.exp,
            })),
        )?,
    }
    Ok(())
}
