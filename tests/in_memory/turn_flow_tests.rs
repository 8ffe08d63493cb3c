//! Chat-turn flow through the orchestrator with in-memory stores.

use rstest::rstest;
use serde_json::json;
use taskchat::conversation::{
    domain::{AgentReply, ConversationId, HistoryEntry, Role, TurnRequest, UserId},
    error::ChatError,
    ports::{AgentError, ConversationStore, MessageStore},
};

use super::helpers::{alice, harness, send};
use crate::test_helpers::{agent::ScriptedAgent, app::TestHarness};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn conversation_is_created_only_when_no_id_is_given(harness: TestHarness, alice: UserId) {
    let first = send(&harness, &alice, None, "Add buy groceries").await;
    assert_eq!(harness.conversations.len(), 1);

    let second = send(&harness, &alice, Some(first.conversation_id), "Also milk").await;
    assert_eq!(second.conversation_id, first.conversation_id);
    assert_eq!(harness.conversations.len(), 1);

    send(&harness, &alice, None, "Something new").await;
    assert_eq!(harness.conversations.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_successful_turn_adds_two_messages(harness: TestHarness, alice: UserId) {
    let first = send(&harness, &alice, None, "one").await;
    send(&harness, &alice, Some(first.conversation_id), "two").await;

    let stored = harness
        .messages
        .list_by_conversation(first.conversation_id)
        .await
        .expect("listing should succeed");
    let roles: Vec<Role> = stored.iter().map(|message| message.role()).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn agent_sees_history_ending_with_the_new_message(harness: TestHarness, alice: UserId) {
    let first = send(&harness, &alice, None, "Add milk").await;
    send(&harness, &alice, Some(first.conversation_id), "and eggs").await;

    let calls = harness.agent.calls();
    let last_call = calls.last().expect("agent should have been called");
    assert_eq!(last_call.text, "and eggs");
    assert_eq!(last_call.user_id, alice);
    assert_eq!(
        last_call.history,
        vec![
            HistoryEntry::new(Role::User, "Add milk"),
            HistoryEntry::new(Role::Assistant, "Done."),
            HistoryEntry::new(Role::User, "and eggs"),
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tool_activity_is_passed_through_verbatim(alice: UserId) {
    let reply = AgentReply::text("I've added 'Buy groceries' to your tasks.")
        .with_tool_call(json!({"tool": "add_task", "parameters": {"title": "Buy groceries"}}))
        .with_tool_result(json!({"task_id": 5, "status": "created", "title": "Buy groceries"}));
    let harness = TestHarness::new(ScriptedAgent::replying("unused").then(Ok(reply)));

    let result = send(&harness, &alice, None, "Add buy groceries").await;

    assert_eq!(result.response_text, "I've added 'Buy groceries' to your tasks.");
    assert_eq!(result.tool_calls.len(), 1);
    assert_eq!(
        result.tool_results,
        vec![json!({"task_id": 5, "status": "created", "title": "Buy groceries"})]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn agent_failure_leaves_a_visible_unanswered_message(alice: UserId) {
    let harness = TestHarness::new(ScriptedAgent::failing(AgentError::invocation("boom")));

    let err = harness
        .orchestrator
        .handle_turn(TurnRequest::new(alice.clone(), "Add buy groceries"))
        .await
        .expect_err("agent failure should surface");
    assert!(matches!(err, ChatError::Agent(_)));

    let listed = harness
        .orchestrator
        .list_conversations(&alice, &alice)
        .await
        .expect("listing should succeed");
    let conversation = listed.first().expect("conversation should exist");
    let messages = harness
        .orchestrator
        .list_messages(&alice, conversation.id)
        .await
        .expect("listing should succeed");
    assert_eq!(messages.len(), 1);
    assert!(messages.iter().all(|message| message.role == Role::User));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_agent_configuration_is_reported(alice: UserId) {
    let harness = TestHarness::new(ScriptedAgent::failing(AgentError::configuration(
        "Gemini API key is not configured",
    )));

    let err = harness
        .orchestrator
        .handle_turn(TurnRequest::new(alice, "hello"))
        .await
        .expect_err("configuration failure should surface");

    assert!(matches!(err, ChatError::Configuration(_)));
    assert_eq!(harness.messages.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn oversized_message_is_rejected_without_writes(harness: TestHarness, alice: UserId) {
    let err = harness
        .orchestrator
        .handle_turn(TurnRequest::new(alice, "x".repeat(1001)))
        .await
        .expect_err("oversized message should be rejected");

    assert!(matches!(err, ChatError::Validation(_)));
    assert!(harness.conversations.is_empty());
    assert!(harness.messages.is_empty());
    assert!(harness.agent.calls().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn another_users_conversation_is_not_found(harness: TestHarness, alice: UserId) {
    let bobs = send(&harness, &UserId::new("bob"), None, "bob's list").await;

    let err = harness
        .orchestrator
        .handle_turn(TurnRequest::new(alice, "sneaky").with_conversation(bobs.conversation_id))
        .await
        .expect_err("foreign conversation should be rejected");

    assert!(matches!(err, ChatError::NotFound(_)));
    assert_eq!(harness.messages.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn long_first_message_is_truncated_into_the_title(harness: TestHarness, alice: UserId) {
    let text = "Please remember to call the dentist tomorrow morning about the appointment";
    let result = send(&harness, &alice, None, text).await;

    let conversation = harness
        .conversations
        .find_by_id(result.conversation_id)
        .await
        .expect("lookup should succeed")
        .expect("conversation should exist");
    let expected: String = text.chars().take(50).chain("...".chars()).collect();
    assert_eq!(conversation.title().as_str(), expected);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_conversation_id_is_not_found(harness: TestHarness, alice: UserId) {
    let err = harness
        .orchestrator
        .handle_turn(TurnRequest::new(alice, "hi").with_conversation(ConversationId::new(404)))
        .await
        .expect_err("unknown conversation should be rejected");

    assert!(matches!(err, ChatError::NotFound(_)));
    assert!(harness.conversations.is_empty());
}
