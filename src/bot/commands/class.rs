//! Class Discord commands - `class add/generate/done`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            cycle::BillingCycle,
            duration, report, student, timestamp,
            timetable::{self, NewClass},
        },
        errors::{Error, Result},
    };

    /// Parent command for scheduling classes.
    #[poise::command(
        slash_command,
        rename = "class",
        subcommands("class_add", "class_generate", "class_done")
    )]
    pub async fn class_manage(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Class command. Available subcommands:\n\
            `/class add` - Schedule a class by hand\n\
            `/class generate` - Create this cycle's classes from weekly slots\n\
            `/class done` - Mark a class as held";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Schedules a class by hand for a student.
    #[poise::command(slash_command, rename = "add")]
    pub async fn class_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student name"]
        #[autocomplete = "autocomplete::autocomplete_student_name"]
        name: String,
        #[description = "Date (YYYY-MM-DD)"] date: String,
        #[description = "Time range (e.g. 09:00 AM to 10:30 AM)"] time: String,
        #[description = "Topic to cover"] topic: Option<String>,
    ) -> Result<()> {
        let Some(day) = timestamp::parse_iso(&date).map(|d| d.date_naive()) else {
            ctx.say(format!("❌ '{date}' is not a date like 2025-01-31."))
                .await?;
            return Ok(());
        };
        let Some((start_time, _)) = duration::parse_range(&time) else {
            ctx.say(format!(
                "❌ '{time}' is not a range like '09:00 AM to 10:30 AM'."
            ))
            .await?;
            return Ok(());
        };

        let db = &ctx.data().database;
        let s = student::require_student_by_name(db, &name).await?;
        let entry = timetable::add_manual_entry(
            db,
            NewClass {
                student_name: s.name,
                subject: s.subject,
                scheduled_at: day.and_time(start_time).and_utc(),
                time_range: time,
                topic: topic.unwrap_or_default(),
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Class #{} scheduled for **{}** on {} ({}, {}).",
            entry.id,
            entry.student_name,
            day,
            entry.time_range,
            report::format_hours(duration::parse_duration_hours(&entry.time_range))
        ))
        .await?;
        Ok(())
    }

    /// Creates this cycle's classes from the student's weekly slots.
    #[poise::command(slash_command, rename = "generate")]
    pub async fn class_generate(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student name"]
        #[autocomplete = "autocomplete::autocomplete_student_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let s = student::require_student_by_name(db, &name).await?;
        let cycle = BillingCycle::for_student(&s)?;

        let created = timetable::generate_auto_entries(db, &s, &cycle).await?;
        if created.is_empty() {
            ctx.say(format!(
                "ℹ️ No new classes for **{}** between {} and {}. Add weekly slots with `/student slot`.",
                s.name,
                cycle.start(),
                cycle.end()
            ))
            .await?;
        } else {
            ctx.say(format!(
                "✅ Created {} class{} for **{}** between {} and {}.",
                created.len(),
                if created.len() == 1 { "" } else { "es" },
                s.name,
                cycle.start(),
                cycle.end()
            ))
            .await?;
        }
        Ok(())
    }

    /// Marks a class as held, optionally noting the topic covered.
    #[poise::command(slash_command, rename = "done")]
    pub async fn class_done(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Class id"] id: i64,
        #[description = "Topic covered"] topic: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let entry = timetable::mark_completed(db, id, topic).await?;

        ctx.say(format!(
            "✅ Class #{} with **{}** marked as held.",
            entry.id, entry.student_name
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
