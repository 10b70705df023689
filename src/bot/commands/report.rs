//! Report Discord commands - `cycle` (text) and `export` (HTML file).

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{report, student},
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;

    /// Shows hours taught and payments in a student's current cycle.
    #[poise::command(slash_command, prefix_command)]
    pub async fn cycle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student name"]
        #[autocomplete = "autocomplete::autocomplete_student_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let config = &ctx.data().config;

        let s = student::require_student_by_name(db, &name).await?;
        let cycle_report = report::generate_cycle_report(
            db,
            s.id,
            Utc::now(),
            config.progress.default_cycle_hours,
        )
        .await?;
        let text = report::format_cycle_report(&cycle_report, &config.academy.currency_symbol)?;

        ctx.say(format!("```\n{text}\n```")).await?;
        Ok(())
    }

    /// Exports a student's cycle report as a standalone HTML file.
    #[poise::command(slash_command, prefix_command)]
    pub async fn export(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student name"]
        #[autocomplete = "autocomplete::autocomplete_student_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let config = &ctx.data().config;

        ctx.defer().await?;

        let s = student::require_student_by_name(db, &name).await?;
        let cycle_report = report::generate_cycle_report(
            db,
            s.id,
            Utc::now(),
            config.progress.default_cycle_hours,
        )
        .await?;
        let html = report::render_html_report(
            &cycle_report,
            &config.academy.name,
            &config.academy.currency_symbol,
        )?;

        let filename = format!(
            "{}-{}.html",
            cycle_report.student.name.replace(' ', "_"),
            cycle_report.cycle.start()
        );
        let attachment = serenity::CreateAttachment::bytes(html.into_bytes(), filename);

        ctx.send(
            poise::CreateReply::default()
                .content(format!("📄 Cycle report for **{}**", cycle_report.student.name))
                .attachment(attachment),
        )
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
