use anyhow::{anyhow, Result};

/// Validate a GitHub username (alphanumeric, hyphens, underscores,
/// 1-39 characters). Rejecting bad input here means no upstream call is
/// ever attempted for it.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || username.len() > 39 {
        return Err(anyhow!("Username must be between 1 and 39 characters"));
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(anyhow!(
            "Username can only contain alphanumeric characters, hyphens, and underscores"
        ));
    }

    Ok(())
}
