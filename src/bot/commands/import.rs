//! Remote import Discord command.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::settings,
        errors::{Error, Result},
        remote::{self, ApiClient},
    };
    use chrono::Utc;
    use std::fmt::Write;

    /// Pulls students, employees and classes from the REST backend.
    #[poise::command(slash_command, prefix_command)]
    pub async fn import(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;

        let Some(client) = ApiClient::from_config(&ctx.data().config.remote)? else {
            ctx.say("ℹ️ No backend configured. Set `remote.base_url` in config.toml.")
                .await?;
            return Ok(());
        };

        ctx.defer().await?;

        let previous = settings::get_setting(db, settings::LAST_IMPORT_KEY).await?;
        let report = remote::import_all(db, &client, Utc::now()).await?;

        let mut response = format!("✅ **Import complete**\n{}", report.summary());
        if let Some(previous) = previous {
            write!(&mut response, "\nPrevious import: {previous}")?;
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
