//! General Discord commands - ping and help.
//! These commands don't touch the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = format!(
            "**{} Help**\n\n\
            **Students**\n\
            • `/student add <name> <subject> <fee> <start> [end] [hours]` - Enrols a student.\n\
            • `/student list` - Lists active students and their payment status.\n\
            • `/student info <name>` - Shows a student's cycle and weekly slots.\n\
            • `/student slot <name> <day> <time>` - Adds a weekly class slot.\n\
            • `/student deactivate <name>` - Hides a student, keeping their history.\n\n\
            **Classes**\n\
            • `/class add <name> <date> <time> [topic]` - Schedules a class by hand.\n\
            • `/class generate <name>` - Creates this cycle's classes from weekly slots.\n\
            • `/class done <id> [topic]` - Marks a class as held.\n\n\
            **Money**\n\
            • `/pay <name> <amount>` - Records a fee payment.\n\
            • `/salary <employee> <amount> [month] [year]` - Records a salary payment.\n\
            • `/payroll [year]` - Salary summary per employee.\n\
            • `/advance` - Moves students whose cycle has ended into the next one.\n\n\
            **Reports**\n\
            • `/dashboard` - Academy overview.\n\
            • `/cycle <name>` - Hours and payments in the current cycle.\n\
            • `/export <name>` - The same report as an HTML file.\n\
            • `/import` - Pulls students, employees and classes from the backend.",
            ctx.data().config.academy.name
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
