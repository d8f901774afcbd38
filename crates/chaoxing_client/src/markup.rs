//! Regex extraction over the portal's semi-structured HTML.
//!
//! The pages a scan touches expose only a handful of stable anchors (attribute
//! names, one id, one inline event handler), so the extraction is a set of
//! targeted patterns rather than a full DOM pass. Every pattern has an
//! explicit no-match branch: a block that does not parse contributes a partial
//! record or is skipped, it never aborts the surrounding scan.

use crate::Course;
use regex::Regex;
use std::sync::LazyLock;

static COURSE_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<li[^>]*class="course clearfix"[^>]*>"#).expect("static regex")
});
static COURSE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\scourseid="([^"]+)""#).expect("static regex"));
static CLASS_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\sclazzid="([^"]+)""#).expect("static regex"));
static COURSE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<span[^>]*class="course-name"[^>]*>(.*?)</span>"#).expect("static regex")
});

static ONGOING_TAB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<a[^>]*\sid="1"[^>]*>(.*?)</a>"#).expect("static regex"));
static PAREN_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)").expect("static regex"));

static START_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<div[^>]*\sid="startList"[^>]*>"#).expect("static regex"));
static END_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<div[^>]*\sid="endList"[^>]*>"#).expect("static regex"));
static MCT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div[^>]*class="[^"]*\bMct\b[^"]*"[^>]*>"#).expect("static regex")
});
static ACTIVE_DETAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"activeDetail\((\d+),(\d+)").expect("static regex"));
static DD_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<dd[^>]*>(.*?)</dd>").expect("static regex"));
static CENTER_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div[^>]*class="[^"]*\bMct_center\b[^"]*"[^>]*>.*?<a[^>]*>(.*?)</a>"#)
        .expect("static regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static regex"));

const UNKNOWN_TEXT: &str = "未知";

/// One activity entry as it appears in the widget markup, before any remote
/// lookups. `active_id`/`type_code` are `None` when the inline
/// `activeDetail(id,type,...)` handler did not parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawActivity {
    pub type_label: String,
    pub name: String,
    pub active_id: Option<String>,
    pub type_code: Option<String>,
}

/// Extract the course entries from the listing page, skipping courses the
/// instructor has closed (结课 marker) or that have ended outright.
pub fn parse_course_list(html: &str) -> Vec<Course> {
    let mut courses = Vec::new();
    for (tag, block) in blocks(html, &COURSE_ITEM) {
        if course_is_closed(block) {
            continue;
        }
        let Some(course_id) = COURSE_ID.captures(tag).map(|c| c[1].to_string()) else {
            continue;
        };
        let Some(class_id) = CLASS_ID.captures(tag).map(|c| c[1].to_string()) else {
            continue;
        };
        let Some(name) = COURSE_NAME
            .captures(block)
            .map(|c| clean_text(&c[1]))
            .filter(|s| !s.is_empty())
        else {
            tracing::debug!(course_id, "course entry without a name, skipped");
            continue;
        };
        courses.push(Course {
            name,
            course_id,
            class_id,
        });
    }
    courses
}

fn course_is_closed(block: &str) -> bool {
    (block.contains("ui-open-review") && block.contains("已开启结课模式"))
        || (block.contains("not-open-tip") && block.contains("课程已结束"))
}

/// Count from the "in progress" tab of the activity widget page.
///
/// `None` when the tab anchor is missing entirely, `Some(0)` when the anchor
/// carries no parenthesised count. Both short-circuit the scan.
pub fn in_progress_count(html: &str) -> Option<u32> {
    let tab = ONGOING_TAB.captures(html)?;
    let count = PAREN_COUNT
        .captures(&tab[1])
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0);
    Some(count)
}

/// Extract the activity entries from the widget's in-progress container.
///
/// The container spans from `startList` to `endList` (or the end of the
/// document). Entries whose event-handler metadata fails to parse still
/// contribute a partial record.
pub fn parse_activities(html: &str) -> Vec<RawActivity> {
    let Some(start) = START_LIST.find(html) else {
        return Vec::new();
    };
    let tail = &html[start.end()..];
    let slice = match END_LIST.find(tail) {
        Some(end) => &tail[..end.start()],
        None => tail,
    };

    let mut activities = Vec::new();
    for (tag, block) in blocks(slice, &MCT_BLOCK) {
        // The handler sits on the entry's own opening tag.
        let detail = ACTIVE_DETAIL
            .captures(tag)
            .map(|c| (c[1].to_string(), c[2].to_string()));
        let (active_id, type_code) = match detail {
            Some((id, code)) => (Some(id), Some(code)),
            None => (None, None),
        };
        activities.push(RawActivity {
            type_label: captured_text(&DD_TEXT, block),
            name: captured_text(&CENTER_ANCHOR, block),
            active_id,
            type_code,
        });
    }
    activities
}

/// Split `html` into blocks, each starting at a match of `opening` and running
/// until the next match (or the end of the input). Yields the opening tag and
/// the whole block.
fn blocks<'h>(html: &'h str, opening: &Regex) -> Vec<(&'h str, &'h str)> {
    let tags: Vec<_> = opening.find_iter(html).collect();
    tags.iter()
        .enumerate()
        .map(|(i, tag)| {
            let end = tags.get(i + 1).map_or(html.len(), |next| next.start());
            (tag.as_str(), &html[tag.start()..end])
        })
        .collect()
}

fn captured_text(pattern: &Regex, block: &str) -> String {
    pattern
        .captures(block)
        .map(|c| clean_text(&c[1]))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_TEXT.to_string())
}

/// Strip nested tags and collapse whitespace in extracted element text.
fn clean_text(raw: &str) -> String {
    let stripped = TAG.replace_all(raw, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
