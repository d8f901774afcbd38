//! Remaining-time resolution for activities that carry a deadline.

use crate::{ChaoxingClient, V2Response};
use chrono::Utc;

/// Label for an activity whose deadline has already passed.
pub const EXPIRED: &str = "已超时";
/// Label for an activity the platform reports as open-ended.
pub const NO_DEADLINE: &str = "无截止时间";

/// Render the time left until `endtime_ms` (epoch milliseconds) as a
/// portal-style label: the two largest units relevant to the magnitude,
/// truncated toward zero, exactly one bucket.
pub fn remaining_label(endtime_ms: i64, now_ms: i64) -> String {
    let remain_ms = endtime_ms - now_ms;
    if remain_ms <= 0 {
        return EXPIRED.to_string();
    }
    let secs = remain_ms / 1000;
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    if days > 0 {
        format!("剩余 {days}天{hours}小时")
    } else if hours > 0 {
        format!("剩余 {hours}小时{minutes}分钟")
    } else {
        format!("剩余 {minutes}分钟")
    }
}

/// Resolve an activity's remaining-time label.
///
/// A successful envelope without an `endtime` is an open-ended activity; an
/// unsuccessful envelope or any transport/parse failure degrades to an empty
/// string and is never propagated.
pub async fn resolve<C: ChaoxingClient>(client: &C, active_id: &str) -> String {
    let resp = match client.active_end_time(active_id).await {
        Ok(resp) => resp,
        Err(err) => {
            tracing::debug!(active_id, error = %err, "deadline lookup failed");
            return String::new();
        }
    };
    interpret(&resp, Utc::now().timestamp_millis())
}

fn interpret(resp: &V2Response, now_ms: i64) -> String {
    match resp.payload() {
        // The platform uses 0 and absent interchangeably for open-ended
        // activities.
        Some(data) => match data.get("endtime").and_then(|v| v.as_i64()).filter(|t| *t != 0) {
            Some(endtime) => remaining_label(endtime, now_ms),
            None => NO_DEADLINE.to_string(),
        },
        None => String::new(),
    }
}
