//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggests student names, employee names and the configured subjects as the
//! admin types. Lookups that fail return no suggestions rather than an error.

use crate::{
    bot::BotData,
    core::{employee, student},
    errors::Error,
};

/// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

/// Keeps the names containing `partial` (case-insensitive), sorted.
fn filter_names(names: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    let mut matching: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .collect();

    matching.sort();
    matching
}

/// Provides autocomplete suggestions for active student names.
pub async fn autocomplete_student_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(students) = student::get_all_active_students(db).await else {
        return Vec::new();
    };

    filter_names(students.into_iter().map(|s| s.name), partial)
}

/// Provides autocomplete suggestions for active employee names.
pub async fn autocomplete_employee_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(employees) = employee::get_all_active_employees(db).await else {
        return Vec::new();
    };

    filter_names(employees.into_iter().map(|e| e.name), partial)
}

/// Provides autocomplete suggestions for the subjects listed in config.toml.
// poise awaits every autocomplete callback
#[allow(clippy::unused_async)]
pub async fn autocomplete_subject(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_names(ctx.data().config.academy.subjects.iter().cloned(), partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_names_is_case_insensitive_and_sorted() {
        let names = ["Zara Ali", "ayesha khan", "Bilal Ahmed"].map(String::from);
        assert_eq!(
            filter_names(names, "A"),
            vec!["Bilal Ahmed", "Zara Ali", "ayesha khan"]
        );
    }

    #[test]
    fn test_filter_names_empty_partial_keeps_all() {
        let names = ["Physics", "Chemistry"].map(String::from);
        assert_eq!(filter_names(names, ""), vec!["Chemistry", "Physics"]);
    }

    #[test]
    fn test_filter_names_caps_suggestions() {
        let names = (0..40).map(|i| format!("Student {i:02}"));
        assert_eq!(filter_names(names, "student").len(), MAX_SUGGESTIONS);
    }
}
