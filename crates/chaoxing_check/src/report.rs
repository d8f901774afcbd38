//! Console rendering of the final report set.

use chaoxing_client::{ActivityStatus, CourseReport};

const RULE_WIDTH: usize = 50;
const NAME_WIDTH: usize = 40;

/// Render the report, grouped by course and sorted by course name.
///
/// Sorting happens only here: the scan completes in arbitrary order and the
/// result set itself carries no ordering.
pub fn render(reports: &[CourseReport]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = format!("\n{rule}\n");

    if reports.is_empty() {
        out.push_str("✅ 太棒了！没有进行中的活动！\n");
        out.push_str(&rule);
        out.push('\n');
        return out;
    }

    let mut sorted: Vec<&CourseReport> = reports.iter().collect();
    sorted.sort_by(|a, b| a.course_name.cmp(&b.course_name));

    out.push_str(&format!(
        "📋 发现 {} 门课程有进行中活动：\n",
        sorted.len()
    ));
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
    for report in sorted {
        out.push_str(&format!("\n📚 {}\n", report.course_name));
        for activity in &report.activities {
            out.push_str(&format!(
                "   ⚡ [{}] {}{}{}\n",
                activity.type_label,
                truncate(&activity.name, NAME_WIDTH),
                status_marker(activity.status),
                time_marker(&activity.time_info),
            ));
        }
    }
    out.push_str(&rule);
    out.push('\n');
    out
}

fn status_marker(status: ActivityStatus) -> String {
    match status {
        ActivityStatus::Signed | ActivityStatus::Submitted => format!(" ✅{}", status.label()),
        ActivityStatus::NotSigned | ActivityStatus::NotSubmitted => {
            format!(" ❌{}", status.label())
        }
        ActivityStatus::Unknown => String::new(),
    }
}

fn time_marker(time_info: &str) -> String {
    if time_info.is_empty() {
        String::new()
    } else {
        format!(" ⏰ {time_info}")
    }
}

fn truncate(name: &str, max_chars: usize) -> String {
    name.chars().take(max_chars).collect()
}
