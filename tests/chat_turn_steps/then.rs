//! Then steps for chat-turn BDD scenarios.

use super::world::{ChatWorld, run_async};
use rstest_bdd_macros::then;
use taskchat::conversation::{
    domain::{Role, TurnResult},
    error::ChatError,
    ports::{ConversationStore, MessageStore},
};

fn last_outcome(world: &ChatWorld) -> Result<&Result<TurnResult, ChatError>, eyre::Report> {
    world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no turn was sent in this scenario"))
}

fn last_error(world: &ChatWorld) -> Result<&ChatError, eyre::Report> {
    match last_outcome(world)? {
        Ok(turn) => Err(eyre::eyre!("expected a failure, got {turn:?}")),
        Err(err) => Ok(err),
    }
}

#[then(r#"the turn succeeds with response "{response}""#)]
fn turn_succeeds(world: &ChatWorld, response: String) -> Result<(), eyre::Report> {
    let turn = last_outcome(world)?
        .as_ref()
        .map_err(|err| eyre::eyre!("turn failed: {err}"))?;
    if turn.response_text != response {
        return Err(eyre::eyre!(
            "expected response {response:?}, got {:?}",
            turn.response_text
        ));
    }
    Ok(())
}

#[then(r#"the user has {count:usize} conversation titled "{title}""#)]
fn user_has_conversations(
    world: &mut ChatWorld,
    count: usize,
    title: String,
) -> Result<(), eyre::Report> {
    let user = world.user.clone();
    let owned = run_async(world.harness().conversations.list_by_owner(&user))
        .map_err(|err| eyre::eyre!("listing failed: {err}"))?;
    if owned.len() != count {
        return Err(eyre::eyre!("expected {count} conversations, found {}", owned.len()));
    }
    if !owned.iter().all(|conversation| conversation.title().as_str() == title) {
        return Err(eyre::eyre!("expected every conversation to be titled {title:?}"));
    }
    Ok(())
}

#[then("the conversation holds {count:usize} messages")]
fn conversation_holds(world: &mut ChatWorld, count: usize) -> Result<(), eyre::Report> {
    let conversation_id = world.current_conversation()?;
    let stored = run_async(world.harness().messages.list_by_conversation(conversation_id))
        .map_err(|err| eyre::eyre!("listing failed: {err}"))?;
    if stored.len() != count {
        return Err(eyre::eyre!("expected {count} messages, found {}", stored.len()));
    }
    if stored.first().map(|message| message.role()) != Some(Role::User) {
        return Err(eyre::eyre!("conversation should open with a user message"));
    }
    Ok(())
}

#[then(r#"the agent last saw {count:usize} history entries ending with "{text}""#)]
fn agent_saw_history(world: &mut ChatWorld, count: usize, text: String) -> Result<(), eyre::Report> {
    let calls = world.harness().agent.calls();
    let last = calls
        .last()
        .ok_or_else(|| eyre::eyre!("agent was never called"))?;
    if last.history.len() != count {
        return Err(eyre::eyre!(
            "expected {count} history entries, found {}",
            last.history.len()
        ));
    }
    match last.history.last() {
        Some(entry) if entry.role == Role::User && entry.content == text => Ok(()),
        other => Err(eyre::eyre!("unexpected final history entry: {other:?}")),
    }
}

#[then("the turn fails with an agent error")]
fn turn_fails_with_agent_error(world: &ChatWorld) -> Result<(), eyre::Report> {
    match last_error(world)? {
        ChatError::Agent(_) => Ok(()),
        other => Err(eyre::eyre!("expected agent error, got {other:?}")),
    }
}

#[then("the turn fails as not found")]
fn turn_fails_not_found(world: &ChatWorld) -> Result<(), eyre::Report> {
    match last_error(world)? {
        ChatError::NotFound(_) => Ok(()),
        other => Err(eyre::eyre!("expected not-found error, got {other:?}")),
    }
}

#[then("the turn fails validation")]
fn turn_fails_validation(world: &ChatWorld) -> Result<(), eyre::Report> {
    match last_error(world)? {
        ChatError::Validation(_) => Ok(()),
        other => Err(eyre::eyre!("expected validation error, got {other:?}")),
    }
}

#[then("nothing was written")]
fn nothing_written(world: &mut ChatWorld) -> Result<(), eyre::Report> {
    let harness = world.harness();
    if !harness.conversations.is_empty() || !harness.messages.is_empty() {
        return Err(eyre::eyre!("expected no stored conversations or messages"));
    }
    Ok(())
}
