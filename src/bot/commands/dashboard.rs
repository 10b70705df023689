//! Dashboard Discord command.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::dashboard,
        errors::{Error, Result},
    };
    use chrono::Utc;

    /// Shows an overview of students, fees, classes and salaries.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        use poise::serenity_prelude as serenity;

        let db = &ctx.data().database;
        let config = &ctx.data().config;
        let now = Utc::now();

        let metrics = dashboard::compute_dashboard(db, now).await?;
        let body = dashboard::format_dashboard(&metrics, &config.academy.currency_symbol)?;

        let embed = serenity::CreateEmbed::default()
            .title(format!("📊 {} Dashboard", config.academy.name))
            .description(format!("```\n{body}\n```"))
            .color(0x0034_98DB)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "As of {}",
                now.format("%Y-%m-%d %H:%M UTC")
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
