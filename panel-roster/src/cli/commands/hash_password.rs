//! `hash-password`: produce a value for the credentials Password column

use anyhow::{Context, Result};
use colored::*;

use crate::auth::password::hash_password;

pub fn handle_hash_password_command() -> Result<()> {
    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }

    let confirm =
        rpassword::prompt_password("Confirm password: ").context("Failed to read password")?;
    if password != confirm {
        anyhow::bail!("Passwords do not match");
    }

    println!("{}", hash_password(&password).bright_green());
    eprintln!("{}", "Paste this value into the Password column".dimmed());
    Ok(())
}
