//! External document shapes and the normalization boundary.
//!
//! Documents from the REST backend use ad hoc field names, some with spaces
//! (`"Monthly Fee"`, `"Payment Status"`), numbers that may arrive as strings and
//! dates in any of the shapes handled by [`crate::core::timestamp`]. The structs
//! here accept all of that; the `normalize_*` functions turn a document into a
//! typed draft or reject it with a reason.

use crate::{
    core::{
        cycle::{BillingCycle, ClassRecord},
        duration,
        payment::PaymentStatus,
        student::parse_weekday,
        timestamp::normalize_value,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc, Weekday};
use serde::Deserialize;
use serde_json::Value;

/// A student as served by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentDocument {
    /// Full name
    #[serde(rename = "Name", alias = "name", alias = "Student Name", default)]
    pub name: Option<String>,
    /// Subject
    #[serde(rename = "Subject", alias = "subject", default)]
    pub subject: Option<String>,
    /// Fee, as a number or numeric text
    #[serde(rename = "Monthly Fee", alias = "monthlyFee", default)]
    pub monthly_fee: Value,
    /// Free-text payment status
    #[serde(rename = "Payment Status", alias = "paymentStatus", default)]
    pub payment_status: Option<String>,
    /// Start of the current cycle (or admission date)
    #[serde(
        rename = "Start Date",
        alias = "startDate",
        alias = "Admission Date",
        default
    )]
    pub start_date: Value,
    /// End of the current cycle
    #[serde(rename = "End Date", alias = "endDate", alias = "Due Date", default)]
    pub end_date: Value,
    /// Contracted hours per cycle
    #[serde(rename = "Contracted Hours", alias = "contractedHours", default)]
    pub contracted_hours: Value,
    /// Active flag
    #[serde(rename = "isActive", default)]
    pub is_active: Option<bool>,
    /// Legacy deactivation flag
    #[serde(default)]
    pub deactivated: Option<bool>,
    /// Weekly class slots
    #[serde(rename = "Class Schedule", alias = "schedule", default)]
    pub schedule: Vec<ScheduleDocument>,
}

/// One weekly slot inside a student document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleDocument {
    /// Weekday name
    #[serde(alias = "Day", default)]
    pub day: String,
    /// Time range
    #[serde(alias = "Time", default)]
    pub time: String,
}

/// An employee as served by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeDocument {
    /// Full name
    #[serde(rename = "Name", alias = "name", default)]
    pub name: Option<String>,
    /// Role or designation
    #[serde(rename = "Role", alias = "role", alias = "Designation", default)]
    pub role: Option<String>,
    /// Monthly salary, as a number or numeric text
    #[serde(rename = "Salary", alias = "salary", alias = "Monthly Salary", default)]
    pub salary: Value,
    /// Joining date
    #[serde(rename = "Joining Date", alias = "joiningDate", default)]
    pub joining_date: Value,
    /// Active flag
    #[serde(rename = "isActive", default)]
    pub is_active: Option<bool>,
}

/// A timetable entry as served by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimetableDocument {
    /// Student attending
    #[serde(rename = "Student Name", alias = "studentName", alias = "student", default)]
    pub student_name: String,
    /// Subject
    #[serde(rename = "Subject", alias = "subject", default)]
    pub subject: String,
    /// Date (and time) of the class, any timestamp shape
    #[serde(rename = "Date", alias = "date", default)]
    pub date: Value,
    /// Time range
    #[serde(rename = "Time", alias = "time", default)]
    pub time: Option<String>,
    /// Topic covered
    #[serde(rename = "Topic", alias = "topic", default)]
    pub topic: Option<String>,
    /// Whether the class was generated from a weekly slot
    #[serde(rename = "isAutoGenerated", alias = "autoGenerated", default)]
    pub auto_generated: bool,
}

impl ClassRecord for TimetableDocument {
    fn student_name(&self) -> &str {
        &self.student_name
    }

    fn subject(&self) -> &str {
        &self.subject
    }

    fn time_range(&self) -> &str {
        self.time.as_deref().unwrap_or_default()
    }

    fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        normalize_value(&self.date)
    }
}

/// A student document after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentDraft {
    /// Trimmed name
    pub name: String,
    /// Trimmed subject
    pub subject: String,
    /// Fee per cycle (0 when absent)
    pub monthly_fee: f64,
    /// Payment status (unpaid when absent or unknown)
    pub payment_status: PaymentStatus,
    /// Current cycle
    pub cycle: BillingCycle,
    /// Contracted hours, if any
    pub contracted_hours: Option<f64>,
    /// Whether the student is active
    pub is_active: bool,
    /// Weekly slots that parsed
    pub slots: Vec<(Weekday, String)>,
}

/// An employee document after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDraft {
    /// Trimmed name
    pub name: String,
    /// Role (empty when absent)
    pub role: String,
    /// Salary (0 when absent)
    pub monthly_salary: f64,
    /// Joining date, if usable
    pub joined_at: Option<DateTime<Utc>>,
    /// Whether the employee is active
    pub is_active: bool,
}

/// Reads an amount given as a JSON number or as text like `"1,200"` or `"$ 95.50"`.
#[must_use]
pub fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };
    amount.is_finite().then_some(amount)
}

fn required_text(value: Option<&str>, field: &str) -> Result<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidInput {
            message: format!("document has no {field}"),
        })
}

/// Converts a student document into a draft.
///
/// Requires a name, a subject and a usable start date. A missing end date means a
/// one-month cycle; an end before the start rejects the document. Schedule slots
/// that do not parse are dropped.
pub fn normalize_student(doc: &StudentDocument) -> Result<StudentDraft> {
    let name = required_text(doc.name.as_deref(), "name")?;
    let subject = required_text(doc.subject.as_deref(), "subject")?;

    let start = normalize_value(&doc.start_date).ok_or_else(|| Error::InvalidInput {
        message: format!("student '{name}' has no usable start date"),
    })?;
    let cycle = match normalize_value(&doc.end_date) {
        Some(end) => BillingCycle::from_instants(start, end)?,
        None => BillingCycle::monthly_from(start.date_naive()),
    };

    let monthly_fee = parse_amount(&doc.monthly_fee).unwrap_or(0.0).max(0.0);
    let contracted_hours = parse_amount(&doc.contracted_hours).filter(|h| *h > 0.0);
    let payment_status = doc
        .payment_status
        .as_deref()
        .and_then(PaymentStatus::parse)
        .unwrap_or(PaymentStatus::Unpaid);
    let is_active = doc.is_active.unwrap_or(true) && !doc.deactivated.unwrap_or(false);

    let slots = doc
        .schedule
        .iter()
        .filter_map(|slot| {
            let weekday = parse_weekday(&slot.day).ok()?;
            duration::parse_range(&slot.time)?;
            Some((weekday, slot.time.trim().to_string()))
        })
        .collect();

    Ok(StudentDraft {
        name,
        subject,
        monthly_fee,
        payment_status,
        cycle,
        contracted_hours,
        is_active,
        slots,
    })
}

/// Converts an employee document into a draft. Requires a name.
pub fn normalize_employee(doc: &EmployeeDocument) -> Result<EmployeeDraft> {
    let name = required_text(doc.name.as_deref(), "name")?;

    Ok(EmployeeDraft {
        name,
        role: doc.role.as_deref().map(str::trim).unwrap_or_default().to_string(),
        monthly_salary: parse_amount(&doc.salary).unwrap_or(0.0).max(0.0),
        joined_at: normalize_value(&doc.joining_date),
        is_active: doc.is_active.unwrap_or(true),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::cycle::select_entries_in_cycle,
        test_utils::date,
    };
    use serde_json::json;

    fn student_doc(value: Value) -> StudentDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_spaced_keys_are_read() {
        let doc = student_doc(json!({
            "Name": " Ayesha Khan ",
            "Subject": "Mathematics",
            "Monthly Fee": "1,200",
            "Payment Status": "Partial",
            "Start Date": { "_seconds": 1_735_689_600, "_nanoseconds": 0 },
            "End Date": "2025-01-31T00:00:00.000Z",
            "Class Schedule": [
                { "day": "Monday", "time": "04:00 PM to 05:00 PM" },
                { "day": "Someday", "time": "04:00 PM to 05:00 PM" },
                { "day": "Tue", "time": "after lunch" }
            ]
        }));

        let draft = normalize_student(&doc).unwrap();
        assert_eq!(draft.name, "Ayesha Khan");
        assert_eq!(draft.monthly_fee, 1200.0);
        assert_eq!(draft.payment_status, PaymentStatus::Partial);
        assert_eq!(draft.cycle.start(), date(2025, 1, 1));
        assert_eq!(draft.cycle.end(), date(2025, 1, 31));
        assert_eq!(
            draft.slots,
            vec![(Weekday::Mon, "04:00 PM to 05:00 PM".to_string())]
        );
        assert!(draft.is_active);
    }

    #[test]
    fn test_camel_case_keys_are_read() {
        let doc = student_doc(json!({
            "name": "Bilal Ahmed",
            "subject": "Physics",
            "monthlyFee": 80,
            "startDate": "2025-03-10",
            "deactivated": true
        }));

        let draft = normalize_student(&doc).unwrap();
        assert_eq!(draft.monthly_fee, 80.0);
        assert_eq!(draft.payment_status, PaymentStatus::Unpaid);
        assert_eq!(draft.cycle.end(), date(2025, 4, 10));
        assert!(!draft.is_active);
    }

    #[test]
    fn test_student_documents_are_rejected_with_reason() {
        let no_name = student_doc(json!({ "Subject": "Physics", "Start Date": "2025-01-01" }));
        assert!(matches!(
            normalize_student(&no_name),
            Err(Error::InvalidInput { .. })
        ));

        let no_date = student_doc(json!({ "Name": "A", "Subject": "Physics" }));
        assert!(matches!(
            normalize_student(&no_date),
            Err(Error::InvalidInput { .. })
        ));

        let backwards = student_doc(json!({
            "Name": "A",
            "Subject": "Physics",
            "Start Date": "2025-02-01",
            "End Date": "2025-01-01"
        }));
        assert!(matches!(
            normalize_student(&backwards),
            Err(Error::InvalidCycle { .. })
        ));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(&json!(95.5)), Some(95.5));
        assert_eq!(parse_amount(&json!("$ 95.50")), Some(95.5));
        assert_eq!(parse_amount(&json!("1,200")), Some(1200.0));
        assert_eq!(parse_amount(&json!("free")), None);
        assert_eq!(parse_amount(&Value::Null), None);
    }

    #[test]
    fn test_normalize_employee() {
        let doc: EmployeeDocument = serde_json::from_value(json!({
            "Name": "Sana Malik",
            "Designation": "Physics Tutor",
            "Monthly Salary": "45,000",
            "Joining Date": { "seconds": 1_725_148_800, "nanoseconds": 0 }
        }))
        .unwrap();

        let draft = normalize_employee(&doc).unwrap();
        assert_eq!(draft.role, "Physics Tutor");
        assert_eq!(draft.monthly_salary, 45000.0);
        assert_eq!(draft.joined_at.unwrap().date_naive(), date(2024, 9, 1));
        assert!(draft.is_active);

        let nameless: EmployeeDocument = serde_json::from_value(json!({ "Role": "Tutor" })).unwrap();
        assert!(normalize_employee(&nameless).is_err());
    }

    #[test]
    fn test_timetable_document_fields() {
        let doc: TimetableDocument = serde_json::from_value(json!({
            "studentName": "Ayesha Khan",
            "subject": "Mathematics",
            "date": { "_seconds": 1_736_931_600, "_nanoseconds": 0 },
            "time": "09:00 AM to 10:30 AM",
            "isAutoGenerated": true
        }))
        .unwrap();

        assert_eq!(doc.student_name, "Ayesha Khan");
        assert!(doc.auto_generated);
        assert!(normalize_value(&doc.date).is_some());
    }

    #[test]
    fn test_timetable_documents_go_through_cycle_filter() {
        let docs: Vec<TimetableDocument> = serde_json::from_value(json!([
            {
                "studentName": "Ayesha Khan",
                "subject": "Mathematics",
                "date": "2025-02-01T09:00:00Z",
                "time": "09:00 AM to 10:00 AM"
            },
            {
                "studentName": "Ayesha Khan",
                "subject": "Mathematics",
                "date": { "_seconds": 1_736_931_600, "_nanoseconds": 0 },
                "time": "09:00 AM to 10:30 AM"
            },
            {
                "studentName": "Ayesha Khan",
                "subject": "Mathematics",
                "date": null,
                "time": "09:00 AM to 10:30 AM"
            }
        ]))
        .unwrap();
        let cycle = BillingCycle::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap();

        let selection =
            select_entries_in_cycle("Ayesha Khan", "Mathematics", &cycle, &docs[..], &[]);
        assert_eq!(selection.len(), 1);
        assert_eq!(selection.excluded_undated, 1);
        assert_eq!(duration::total_cycle_hours(&selection.entries), 1.5);
    }

    #[test]
    fn test_deactivated_flag_wins_over_is_active() {
        let doc = student_doc(json!({
            "Name": "Bilal Ahmed",
            "Subject": "Physics",
            "Start Date": "2025-03-10",
            "isActive": true,
            "deactivated": true
        }));
        assert!(!normalize_student(&doc).unwrap().is_active);

        let reactivated = student_doc(json!({
            "Name": "Bilal Ahmed",
            "Subject": "Physics",
            "Start Date": "2025-03-10",
            "deactivated": false
        }));
        assert!(normalize_student(&reactivated).unwrap().is_active);
    }
}
