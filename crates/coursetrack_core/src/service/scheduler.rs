//! Deadline and reminder scheduling across courses.
//!
//! # Responsibility
//! - Merge dated assessments from every course into one ranked sequence.
//! - Provide a bounded preview plus the full upcoming list.
//! - Select reminders whose trigger moment has arrived.
//!
//! # Invariants
//! - "Upcoming" is inclusive: a deadline equal to `now` is kept.
//! - Ordering is `(deadline, course_code, name)`, total and deterministic.
//! - `now` is always supplied by the caller; nothing reads the clock here.

use crate::model::assessment::{Assessment, AssessmentKey};
use crate::model::course::Course;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum number of entries in the compact deadline preview.
pub const DEADLINE_PREVIEW_LIMIT: usize = 5;

/// One assessment with a deadline at or after `now`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDeadline {
    pub key: AssessmentKey,
    pub deadline: DateTime<Utc>,
    pub assessment: Assessment,
}

/// Compact preview of the nearest deadlines.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "items", rename_all = "snake_case")]
pub enum DeadlinePreview {
    /// Between one and `DEADLINE_PREVIEW_LIMIT` entries, earliest first.
    Upcoming(Vec<UpcomingDeadline>),
    /// Nothing is due at or after `now`.
    NoUpcomingDeadlines,
}

impl DeadlinePreview {
    pub fn items(&self) -> &[UpcomingDeadline] {
        match self {
            Self::Upcoming(items) => items,
            Self::NoUpcomingDeadlines => &[],
        }
    }
}

/// Reminder whose trigger moment has been reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueReminder {
    pub key: AssessmentKey,
    pub reminder: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Every deadline at or after `now`, sorted, untruncated.
pub fn upcoming_deadlines<'a, I>(courses: I, now: DateTime<Utc>) -> Vec<UpcomingDeadline>
where
    I: IntoIterator<Item = &'a Course>,
{
    let mut items: Vec<UpcomingDeadline> = courses
        .into_iter()
        .flat_map(|course| {
            course.assessments.iter().filter_map(move |item| {
                let deadline = item.deadline?;
                (deadline >= now).then(|| UpcomingDeadline {
                    key: item.key(&course.code),
                    deadline,
                    assessment: item.clone(),
                })
            })
        })
        .collect();
    items.sort_by(|a, b| a.deadline.cmp(&b.deadline).then_with(|| a.key.cmp(&b.key)));
    items
}

/// The nearest `DEADLINE_PREVIEW_LIMIT` deadlines, or an explicit empty state.
pub fn deadline_preview<'a, I>(courses: I, now: DateTime<Utc>) -> DeadlinePreview
where
    I: IntoIterator<Item = &'a Course>,
{
    let mut items = upcoming_deadlines(courses, now);
    if items.is_empty() {
        return DeadlinePreview::NoUpcomingDeadlines;
    }
    items.truncate(DEADLINE_PREVIEW_LIMIT);
    DeadlinePreview::Upcoming(items)
}

/// Reminders due at `now` for work that is still open.
///
/// An assessment qualifies when its reminder is at or before `now`, it has no
/// mark yet, and its deadline (if any) has not passed. Sorted by reminder,
/// then key.
pub fn due_reminders<'a, I>(courses: I, now: DateTime<Utc>) -> Vec<DueReminder>
where
    I: IntoIterator<Item = &'a Course>,
{
    let mut due: Vec<DueReminder> = courses
        .into_iter()
        .flat_map(|course| {
            course.assessments.iter().filter_map(move |item| {
                let reminder = item.reminder?;
                let open = !item.mark.is_graded() && item.deadline.map_or(true, |d| d >= now);
                (reminder <= now && open).then(|| DueReminder {
                    key: item.key(&course.code),
                    reminder,
                    deadline: item.deadline,
                })
            })
        })
        .collect();
    due.sort_by(|a, b| a.reminder.cmp(&b.reminder).then_with(|| a.key.cmp(&b.key)));
    due
}
