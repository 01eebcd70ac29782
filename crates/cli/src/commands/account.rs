use anyhow::{Context, Result};
use serde::Serialize;

use faqueue_core::{save_auth, SubmissionClient};

use crate::context::AppContext;

pub fn auth(ctx: &AppContext, a_cookie: &str, b_cookie: &str) -> Result<()> {
    save_auth(ctx.config_path(), a_cookie, b_cookie)
        .with_context(|| format!("Failed to store cookies in {:?}", ctx.config_path()))?;
    println!("Authentication info stored.");
    Ok(())
}

pub async fn notifications(ctx: &AppContext) -> Result<()> {
    let client = ctx.client()?;
    let counters = client
        .notifications()
        .await
        .context("Failed to read notifications")?;
    print_json(&counters)
}

pub(crate) fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}
