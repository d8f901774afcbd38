//! Bounded fan-out of per-course scans.

use crate::config::ScanConfig;
use crate::{ChaoxingClient, Course, CourseReport, scan};
use futures_util::{StreamExt, stream};

/// Run the course scanner over the whole course set under a bounded pool.
///
/// Results arrive in completion order, so the returned collection carries no
/// ordering guarantee; callers sort at presentation time if they care. Absent
/// results are dropped, every course is attempted exactly once, and a failing
/// scan never cancels or delays its siblings.
pub async fn scan_all<C: ChaoxingClient>(
    client: &C,
    courses: &[Course],
    config: &ScanConfig,
) -> Vec<CourseReport> {
    let limit = config.max_concurrent.max(1);
    let scans = courses.iter().map(|course| scan::scan(client, course));
    let mut in_flight = stream::iter(scans).buffer_unordered(limit);

    let mut reports = Vec::new();
    while let Some(result) = in_flight.next().await {
        if let Some(report) = result {
            reports.push(report);
        }
    }
    tracing::info!(
        scanned = courses.len(),
        reported = reports.len(),
        "course scan finished"
    );
    reports
}
