//! Notification formatter tests.

use crate::sync::{
    adapters::notify::{
        BlockKitFormatter, Member, MemberDirectory, MessageFormatter, SlackNotifier,
        TemplateFormatter,
    },
    domain::{AssigneeId, Priority, RemoteId, SyncAction, TaskRecord},
    ports::{NotifierError, UpsertEvent, UpsertNotifier},
};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn event() -> UpsertEvent {
    UpsertEvent {
        task: TaskRecord::new("finding-7", "Rotate leaked key")
            .expect("valid task")
            .with_priority(Priority::HIGH)
            .with_category("security")
            .with_tags(vec!["secrets".to_owned(), "p1".to_owned()]),
        remote_id: RemoteId::new("9ab").expect("valid remote id"),
        action: SyncAction::Created,
        assignees: vec![AssigneeId::new(9), AssigneeId::new(12)],
        synced_at: Utc
            .with_ymd_and_hms(2026, 10, 16, 9, 30, 0)
            .single()
            .expect("valid timestamp"),
    }
}

fn members() -> MemberDirectory {
    MemberDirectory::new().with_member(
        AssigneeId::new(9),
        Member {
            name: "Ada".to_owned(),
            department: Some("SecOps".to_owned()),
        },
    )
}

fn field_texts(message: &Value) -> Vec<String> {
    message
        .pointer("/blocks/2/fields")
        .and_then(Value::as_array)
        .map(|fields| {
            fields
                .iter()
                .filter_map(|field| field.get("text").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
fn member_directory_describes_known_and_unknown_users() {
    let described = members().describe(&[AssigneeId::new(9), AssigneeId::new(12)]);
    assert_eq!(described.as_deref(), Some("Ada [SecOps], User ID: 12"));
    assert_eq!(members().describe(&[]), None);
}

#[rstest]
fn block_kit_message_has_header_title_and_link(event: UpsertEvent) {
    let message = BlockKitFormatter::new(members())
        .format(&event)
        .expect("format");

    assert_eq!(message["text"], json!("ClickUp CREATED: Rotate leaked key"));
    assert_eq!(message["blocks"][0]["text"]["text"], json!(":new: Task CREATED"));
    assert_eq!(
        message["blocks"][1]["text"]["text"],
        json!("*Title:* Rotate leaked key")
    );
    assert_eq!(
        message["blocks"][3]["elements"][0]["url"],
        json!("https://app.clickup.com/t/9ab")
    );
    assert_eq!(
        field_texts(&message),
        vec![
            "*Priority:*\nHigh".to_owned(),
            "*Category:*\nsecurity".to_owned(),
            "*Tags:*\nsecrets, p1".to_owned(),
            "*Assignees:*\nAda [SecOps], User ID: 12".to_owned(),
            "*Internal ID:*\n`finding-7`".to_owned(),
        ]
    );
}

#[rstest]
fn block_kit_message_skips_empty_fields() {
    let bare = UpsertEvent {
        task: TaskRecord::new("order_101", "Ship order").expect("valid task"),
        remote_id: RemoteId::new("9ab").expect("valid remote id"),
        action: SyncAction::Updated,
        assignees: Vec::new(),
        synced_at: Utc::now(),
    };

    let message = BlockKitFormatter::default().format(&bare).expect("format");

    assert_eq!(
        message["blocks"][0]["text"]["text"],
        json!(":arrows_counterclockwise: Task UPDATED")
    );
    assert_eq!(
        field_texts(&message),
        vec!["*Internal ID:*\n`order_101`".to_owned()]
    );
}

#[rstest]
fn template_formatter_renders_event_fields(event: UpsertEvent) {
    let formatter =
        TemplateFormatter::new("{{ action }} {{ title }} [{{ priority }}] -> {{ url }}")
            .expect("valid template");

    let message = formatter.format(&event).expect("format");

    assert_eq!(
        message,
        json!({ "text": "CREATED Rotate leaked key [High] -> https://app.clickup.com/t/9ab" })
    );
}

#[rstest]
fn template_formatter_rejects_invalid_syntax() {
    let result = TemplateFormatter::new("{{ title ");
    assert!(matches!(result, Err(NotifierError::Format(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn slack_notifier_without_webhook_only_previews(event: UpsertEvent) {
    let notifier = SlackNotifier::new(None, members());
    notifier.notify(&event).await.expect("preview succeeds");
}
