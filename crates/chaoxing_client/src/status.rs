//! Completion-status classification for the activity types that expose a
//! verification endpoint.

use crate::{ActivityKind, ActivityStatus, ChaoxingClient, V2Response};

/// Classify one activity's completion state with the type-specific check.
///
/// Group tasks have no verification endpoint and map straight to
/// [`ActivityStatus::Unknown`] without a remote call, as does every
/// unrecognised type code. Remote failures degrade to `Unknown` too;
/// classification never raises past this boundary.
pub async fn classify<C: ChaoxingClient>(
    client: &C,
    active_id: &str,
    kind: ActivityKind,
) -> ActivityStatus {
    match kind {
        ActivityKind::Quiz => match client.answer_result(active_id).await {
            Ok(resp) => quiz_status(&resp),
            Err(err) => {
                tracing::debug!(active_id, error = %err, "answer result lookup failed");
                ActivityStatus::Unknown
            }
        },
        ActivityKind::CheckIn => match client.sign_state(active_id).await {
            Ok(resp) => check_in_status(&resp),
            Err(err) => {
                tracing::debug!(active_id, error = %err, "sign state lookup failed");
                ActivityStatus::Unknown
            }
        },
        ActivityKind::GroupTask | ActivityKind::Other => ActivityStatus::Unknown,
    }
}

/// A successful answer-result payload decides submitted or not; an
/// unsuccessful envelope stays indeterminate.
fn quiz_status(resp: &V2Response) -> ActivityStatus {
    match resp.payload() {
        Some(data) => {
            let answered = data
                .get("isAnswered")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if answered {
                ActivityStatus::Submitted
            } else {
                ActivityStatus::NotSubmitted
            }
        }
        None => ActivityStatus::Unknown,
    }
}

/// The sign-in endpoint attaches a payload only for an already signed-in
/// user; a call that comes back without one means not signed.
fn check_in_status(resp: &V2Response) -> ActivityStatus {
    if resp.payload().is_some() {
        ActivityStatus::Signed
    } else {
        ActivityStatus::NotSigned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> V2Response {
        serde_json::from_value(value).expect("envelope")
    }

    #[test]
    fn quiz_answered_is_submitted() {
        let resp = envelope(json!({"result": 1, "data": {"isAnswered": true}}));
        assert_eq!(quiz_status(&resp), ActivityStatus::Submitted);
    }

    #[test]
    fn quiz_without_answer_flag_is_not_submitted() {
        let resp = envelope(json!({"result": 1, "data": {"isAnswered": false}}));
        assert_eq!(quiz_status(&resp), ActivityStatus::NotSubmitted);
        let resp = envelope(json!({"result": 1, "data": {"score": 10}}));
        assert_eq!(quiz_status(&resp), ActivityStatus::NotSubmitted);
    }

    #[test]
    fn quiz_unsuccessful_envelope_is_unknown() {
        let resp = envelope(json!({"result": 0, "data": {"isAnswered": true}}));
        assert_eq!(quiz_status(&resp), ActivityStatus::Unknown);
    }

    #[test]
    fn check_in_payload_means_signed() {
        let resp = envelope(json!({"result": 1, "data": {"signTime": 1700000000}}));
        assert_eq!(check_in_status(&resp), ActivityStatus::Signed);
    }

    #[test]
    fn check_in_empty_payload_means_not_signed() {
        let resp = envelope(json!({"result": 1, "data": null}));
        assert_eq!(check_in_status(&resp), ActivityStatus::NotSigned);
        let resp = envelope(json!({"result": 0}));
        assert_eq!(check_in_status(&resp), ActivityStatus::NotSigned);
    }
}
