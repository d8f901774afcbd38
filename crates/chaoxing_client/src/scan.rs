//! Per-course scan: fetch the activity widget, extract the in-progress
//! entries, then classify and time-resolve each one.

use crate::markup::{self, RawActivity};
use crate::{
    Activity, ActivityKind, ActivityStatus, ChaoxingClient, ChaoxingError, Course, CourseReport,
    deadline, status,
};

/// Scan one course for in-progress activities.
///
/// Absence covers both "nothing in progress" and "scan failed": a single
/// course must never take the batch down, so every fault is absorbed at this
/// boundary. The two cases are deliberately indistinguishable to the caller.
pub async fn scan<C: ChaoxingClient>(client: &C, course: &Course) -> Option<CourseReport> {
    match scan_inner(client, course).await {
        Ok(report) => report,
        Err(err) => {
            tracing::debug!(course = %course.name, error = %err, "course scan failed");
            None
        }
    }
}

async fn scan_inner<C: ChaoxingClient>(
    client: &C,
    course: &Course,
) -> Result<Option<CourseReport>, ChaoxingError> {
    let html = client
        .activity_page(&course.course_id, &course.class_id)
        .await?;

    // Counter first: most courses have nothing in progress, and a zero (or
    // missing) counter skips the entry parsing entirely. The counter is a
    // hint only; it is not re-validated against the parsed entries.
    if markup::in_progress_count(&html).unwrap_or(0) == 0 {
        return Ok(None);
    }

    let raw = markup::parse_activities(&html);
    if raw.is_empty() {
        return Ok(None);
    }

    let mut activities = Vec::with_capacity(raw.len());
    for entry in raw {
        activities.push(resolve_activity(client, entry).await);
    }
    Ok(Some(CourseReport {
        course_name: course.name.clone(),
        activities,
    }))
}

/// Fill in status and remaining time for one extracted entry.
///
/// Lookups within one course stay sequential to bound load on the portal;
/// only whole courses run concurrently.
async fn resolve_activity<C: ChaoxingClient>(client: &C, raw: RawActivity) -> Activity {
    let kind = raw
        .type_code
        .as_deref()
        .map_or(ActivityKind::Other, ActivityKind::from_code);

    let (status, time_info) = match &raw.active_id {
        Some(id) => (
            status::classify(client, id, kind).await,
            deadline::resolve(client, id).await,
        ),
        None => (ActivityStatus::Unknown, String::new()),
    };

    Activity {
        type_label: raw.type_label,
        name: raw.name,
        active_id: raw.active_id,
        kind,
        time_info,
        status,
    }
}
