//! Course enumeration from the portal listing page.

use crate::{ChaoxingClient, ChaoxingError, Course, markup};

/// Fetch and parse the user's course list, already filtered of closed and
/// ended courses.
///
/// Unlike the per-course scan this is run-fatal: without a course list there
/// is nothing left to do.
pub async fn fetch_courses<C: ChaoxingClient>(client: &C) -> Result<Vec<Course>, ChaoxingError> {
    let html = client.course_list_page().await?;
    let courses = markup::parse_course_list(&html);
    tracing::info!(count = courses.len(), "course list fetched");
    Ok(courses)
}
