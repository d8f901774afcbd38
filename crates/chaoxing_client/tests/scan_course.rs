use std::time::Duration;

use chaoxing_client::http_client::{Endpoints, ReqwestChaoxingClient};
use chaoxing_client::{ActivityKind, ActivityStatus, Course, scan};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestChaoxingClient {
    ReqwestChaoxingClient::new(Endpoints::single(&server.uri()), Duration::from_secs(8))
}

fn course() -> Course {
    Course {
        name: "高等数学".into(),
        course_id: "9001".into(),
        class_id: "8001".into(),
    }
}

async fn mount_widget(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/widget/pcpick/stu/index"))
        .and(query_param("courseId", "9001"))
        .and(query_param("jclassId", "8001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn missing_counter_tab_yields_absent_without_detail_requests() {
    let server = MockServer::start().await;
    mount_widget(&server, "<div>页面没有进行中标签</div>").await;

    let client = client_for(&server);
    assert!(scan::scan(&client, &course()).await.is_none());

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
}

#[tokio::test]
async fn zero_count_yields_absent_without_detail_requests() {
    let server = MockServer::start().await;
    let body = r##"
      <a id="1" href="#">进行中(0)</a>
      <div id="startList">
        <div class="Mct" onclick="activeDetail(1,42,null)">
          <dl><dd>随堂练习</dd></dl>
          <div class="Mct_center"><a href="#">不该被解析</a></div>
        </div>
      </div>"##;
    mount_widget(&server, body).await;

    let client = client_for(&server);
    assert!(scan::scan(&client, &course()).await.is_none());

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
}

#[tokio::test]
async fn nonzero_count_with_empty_list_yields_absent() {
    let server = MockServer::start().await;
    // The counter is a hint only; an empty container still means no report.
    let body = r##"
      <a id="1" href="#">进行中(2)</a>
      <div id="startList"></div>"##;
    mount_widget(&server, body).await;

    let client = client_for(&server);
    assert!(scan::scan(&client, &course()).await.is_none());
}

#[tokio::test]
async fn group_task_reports_unknown_status_without_status_lookup() {
    let server = MockServer::start().await;
    let body = r##"
      <a id="1" href="#">进行中(1)</a>
      <div id="startList">
        <div class="Mct" onclick="activeDetail(111,35,null)">
          <dl><dd>分组任务</dd></dl>
          <div class="Mct_center"><a href="#">小组研讨</a></div>
        </div>
      </div>"##;
    mount_widget(&server, body).await;
    Mock::given(method("GET"))
        .and(path("/v2/apis/active/getActiveEndtime"))
        .and(query_param("activeId", "111"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": 1,
            "data": {"activeId": 111}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = scan::scan(&client, &course()).await.expect("report");

    assert_eq!(report.course_name, "高等数学");
    assert_eq!(report.activities.len(), 1);
    let activity = &report.activities[0];
    assert_eq!(activity.kind, ActivityKind::GroupTask);
    assert_eq!(activity.status, ActivityStatus::Unknown);
    assert_eq!(activity.time_info, "无截止时间");

    // Only the widget page and the deadline endpoint were hit; group tasks
    // never trigger a status check.
    let received = server.received_requests().await.unwrap();
    assert!(
        received
            .iter()
            .all(|r| !r.url.path().contains("signIn") && !r.url.path().contains("getAnswerResult"))
    );
}

#[tokio::test]
async fn unparseable_handler_still_produces_partial_record() {
    let server = MockServer::start().await;
    let body = r##"
      <a id="1" href="#">进行中(1)</a>
      <div id="startList">
        <div class="Mct" onclick="javascript:void(0)">
          <dl><dd>签到</dd></dl>
          <div class="Mct_center"><a href="#">周三签到</a></div>
        </div>
      </div>"##;
    mount_widget(&server, body).await;

    let client = client_for(&server);
    let report = scan::scan(&client, &course()).await.expect("report");

    let activity = &report.activities[0];
    assert_eq!(activity.name, "周三签到");
    assert_eq!(activity.active_id, None);
    assert_eq!(activity.status, ActivityStatus::Unknown);
    assert_eq!(activity.time_info, "");

    // No identifier, no detail lookups.
    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
}

#[tokio::test]
async fn expired_deadline_labels_time_without_touching_status() {
    let server = MockServer::start().await;
    let body = r##"
      <a id="1" href="#">进行中(1)</a>
      <div id="startList">
        <div class="Mct" onclick="activeDetail(222,42,null)">
          <dl><dd>随堂练习</dd></dl>
          <div class="Mct_center"><a href="#">期中小测</a></div>
        </div>
      </div>"##;
    mount_widget(&server, body).await;
    Mock::given(method("GET"))
        .and(path("/v2/apis/studentQuestion/getAnswerResult"))
        .and(query_param("activeId", "222"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": 1,
            "data": {"isAnswered": false}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/apis/active/getActiveEndtime"))
        .and(query_param("activeId", "222"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": 1,
            "data": {"endtime": 1_600_000_000_000_i64}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = scan::scan(&client, &course()).await.expect("report");

    let activity = &report.activities[0];
    assert_eq!(activity.time_info, "已超时");
    assert_eq!(activity.status, ActivityStatus::NotSubmitted);
}

#[tokio::test]
async fn degraded_detail_lookups_keep_the_record() {
    let server = MockServer::start().await;
    let body = r##"
      <a id="1" href="#">进行中(1)</a>
      <div id="startList">
        <div class="Mct" onclick="activeDetail(333,2,null)">
          <dl><dd>签到</dd></dl>
          <div class="Mct_center"><a href="#">晚课签到</a></div>
        </div>
      </div>"##;
    mount_widget(&server, body).await;
    // Both detail endpoints fail; the record survives with empty fields.
    Mock::given(method("GET"))
        .and(path("/v2/apis/sign/signIn"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/apis/active/getActiveEndtime"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = scan::scan(&client, &course()).await.expect("report");

    let activity = &report.activities[0];
    assert_eq!(activity.kind, ActivityKind::CheckIn);
    assert_eq!(activity.status, ActivityStatus::Unknown);
    assert_eq!(activity.time_info, "");
}
