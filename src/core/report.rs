//! Cycle report generation.
//!
//! A cycle report reconciles a student's classes with their current billing cycle:
//! which classes fell inside it, how many hours they add up to and how far that is
//! towards the cycle's hour target. It can be rendered as text for the bot or as a
//! standalone HTML document for download.

use crate::{
    core::{
        cycle::{self, BillingCycle},
        duration,
        payment::{self, PaymentStatus},
        student, timetable,
    },
    entities::{payment as payment_entity, student as student_entity, timetable_entry},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use std::fmt::Write;

/// One class inside the reported cycle.
#[derive(Debug, Clone)]
pub struct ReportedClass {
    /// The timetable entry
    pub entry: timetable_entry::Model,
    /// Hours the class lasted
    pub hours: f64,
}

/// A student's billing-cycle report.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// The student reported on
    pub student: student_entity::Model,
    /// The cycle reported on
    pub cycle: BillingCycle,
    /// Classes inside the cycle, oldest first
    pub classes: Vec<ReportedClass>,
    /// Sum of class hours
    pub total_hours: f64,
    /// Hour target for the cycle
    pub target_hours: f64,
    /// Progress towards the target (0-100)
    pub percent_complete: f64,
    /// Whether the cycle has not ended yet
    pub ongoing: bool,
    /// Classes of this student left out because their date was unusable
    pub excluded_undated: usize,
    /// Fee payments made towards the cycle
    pub payments: Vec<payment_entity::Model>,
    /// Total of those payments
    pub amount_paid: f64,
    /// Payment status derived from the fee and the amount paid
    pub payment_status: PaymentStatus,
}

/// Builds the report for a student's current cycle as of `now`.
///
/// `default_target_hours` applies when the student has no contracted hours.
pub async fn generate_cycle_report(
    db: &DatabaseConnection,
    student_id: i64,
    now: DateTime<Utc>,
    default_target_hours: f64,
) -> Result<CycleReport> {
    let student = student::get_student_by_id(db, student_id)
        .await?
        .ok_or_else(|| Error::StudentNotFound {
            name: student_id.to_string(),
        })?;

    let timetable = timetable::entries_for_student(db, &student.name, &student.subject).await?;
    let cycle = BillingCycle::for_student(&student)?;
    let selection = cycle::select_cycle_entries(&student, &timetable.manual, &timetable.auto)?;

    let total_hours = duration::total_cycle_hours(&selection.entries);
    let target_hours = duration::target_hours(student.contracted_hours, default_target_hours);
    let classes = selection
        .entries
        .iter()
        .map(|entry| ReportedClass {
            entry: entry.record.clone(),
            hours: duration::parse_duration_hours(&entry.record.time_range),
        })
        .collect();
    let excluded_undated = selection.excluded_undated;

    let payments = payment::payments_for_cycle(db, student.id, &cycle).await?;
    let amount_paid: f64 = payments.iter().map(|p| p.amount_paid).sum();

    Ok(CycleReport {
        payment_status: PaymentStatus::from_amounts(student.monthly_fee, amount_paid),
        ongoing: cycle.is_ongoing(now),
        percent_complete: duration::percent_complete(total_hours, target_hours),
        student,
        cycle,
        classes,
        total_hours,
        target_hours,
        excluded_undated,
        payments,
        amount_paid,
    })
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // Cast safety: clamped_progress ∈ [0, 100], length is small (10-20).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!(
        "[{}{}] {progress_percent:.1}%",
        "█".repeat(filled),
        "░".repeat(empty)
    )
}

/// Formats hours like `"1.5 h"`.
#[must_use]
pub fn format_hours(hours: f64) -> String {
    let rounded = (hours * 100.0).round() / 100.0;
    format!("{rounded} h")
}

/// Formats an amount with the academy's currency symbol, e.g. `"$120.00"`.
#[must_use]
pub fn format_currency(amount: f64, symbol: &str) -> String {
    format!("{symbol}{amount:.2}")
}

/// Formats a cycle report as plain text.
pub fn format_cycle_report(report: &CycleReport, currency: &str) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{} - {} | cycle {} to {} ({})",
        report.student.name,
        report.student.subject,
        report.cycle.start(),
        report.cycle.end(),
        if report.ongoing { "ongoing" } else { "ended" }
    )?;
    writeln!(
        out,
        "Hours: {} of {} {}",
        format_hours(report.total_hours),
        format_hours(report.target_hours),
        format_progress_bar(report.percent_complete, Some(10))
    )?;
    writeln!(
        out,
        "Fee: {} of {} ({})",
        format_currency(report.amount_paid, currency),
        format_currency(report.student.monthly_fee, currency),
        report.payment_status
    )?;

    if report.classes.is_empty() {
        writeln!(out, "No classes in this cycle.")?;
    }
    for class in &report.classes {
        writeln!(
            out,
            "  {} {} {} [{}]{}",
            class.entry.scheduled_at.format("%a %Y-%m-%d"),
            class.entry.time_range,
            format_hours(class.hours),
            class.entry.source,
            if class.entry.topic.is_empty() {
                String::new()
            } else {
                format!(" - {}", class.entry.topic)
            }
        )?;
    }
    if report.excluded_undated > 0 {
        writeln!(
            out,
            "{} class(es) without a usable date were left out.",
            report.excluded_undated
        )?;
    }
    Ok(out)
}

/// Renders a cycle report as a standalone HTML document.
pub fn render_html_report(report: &CycleReport, academy_name: &str, currency: &str) -> Result<String> {
    let mut html = String::new();
    let title = format!(
        "{} - {} - {} to {}",
        report.student.name,
        report.student.subject,
        report.cycle.start(),
        report.cycle.end()
    );

    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\">")?;
    writeln!(html, "<title>{}</title>", escape_html(&title))?;
    writeln!(
        html,
        "<style>body{{font-family:sans-serif;margin:2em}}table{{border-collapse:collapse}}td,th{{border:1px solid #ccc;padding:4px 8px}}</style>"
    )?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;
    writeln!(html, "<h1>{}</h1>", escape_html(academy_name))?;
    writeln!(html, "<h2>{}</h2>", escape_html(&title))?;

    writeln!(html, "<ul>")?;
    writeln!(
        html,
        "<li>Status: {}</li>",
        if report.ongoing { "ongoing" } else { "ended" }
    )?;
    writeln!(
        html,
        "<li>Hours: {} of {} ({:.1}%)</li>",
        escape_html(&format_hours(report.total_hours)),
        escape_html(&format_hours(report.target_hours)),
        report.percent_complete
    )?;
    writeln!(
        html,
        "<li>Fee: {} of {} ({})</li>",
        escape_html(&format_currency(report.amount_paid, currency)),
        escape_html(&format_currency(report.student.monthly_fee, currency)),
        report.payment_status
    )?;
    writeln!(html, "</ul>")?;

    writeln!(html, "<h3>Classes</h3>")?;
    writeln!(
        html,
        "<table><tr><th>Date</th><th>Time</th><th>Hours</th><th>Source</th><th>Topic</th><th>Held</th></tr>"
    )?;
    for class in &report.classes {
        writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            class.entry.scheduled_at.format("%Y-%m-%d"),
            escape_html(&class.entry.time_range),
            escape_html(&format_hours(class.hours)),
            escape_html(&class.entry.source),
            escape_html(&class.entry.topic),
            if class.entry.completed { "yes" } else { "no" }
        )?;
    }
    writeln!(html, "</table>")?;

    writeln!(html, "<h3>Payments</h3>")?;
    writeln!(html, "<table><tr><th>Date</th><th>Amount</th></tr>")?;
    for p in &report.payments {
        writeln!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            p.paid_at.format("%Y-%m-%d"),
            escape_html(&format_currency(p.amount_paid, currency))
        )?;
    }
    writeln!(html, "</table>")?;
    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;

    Ok(html)
}

/// Escapes the five HTML-significant characters.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
