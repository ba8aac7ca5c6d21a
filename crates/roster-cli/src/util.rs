use crate::error::invalid_input;
use anyhow::Result;
use roster_core::domain::{User, UserId};
use std::str::FromStr;

pub fn parse_user_id(raw: &str) -> Result<UserId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_input("user id cannot be empty"));
    }
    let id = UserId::from_str(trimmed).map_err(|_| invalid_input("invalid user id"))?;
    if id.as_i64() <= 0 {
        return Err(invalid_input("user id must be positive"));
    }
    Ok(id)
}

pub fn format_user_line(user: &User) -> String {
    format!("{} <{}>", user.name, user.email)
}
