//! Shared world state for chat-turn BDD scenarios.

use rstest::fixture;
use taskchat::conversation::{
    domain::{ConversationId, TurnResult, UserId},
    error::ChatResult,
    ports::ConversationStore,
};

use crate::test_helpers::{agent::ScriptedAgent, app::TestHarness};

/// Scenario world for chat-turn behaviour tests.
pub struct ChatWorld {
    pub user: UserId,
    pub pending_agent: Option<ScriptedAgent>,
    pub harness: Option<TestHarness>,
    pub conversation: Option<ConversationId>,
    pub foreign_conversation: Option<ConversationId>,
    pub last_result: Option<ChatResult<TurnResult>>,
}

impl ChatWorld {
    /// Creates a world acting as an anonymous placeholder user.
    #[must_use]
    pub fn new() -> Self {
        Self {
            user: UserId::new("anonymous"),
            pending_agent: None,
            harness: None,
            conversation: None,
            foreign_conversation: None,
            last_result: None,
        }
    }

    /// Returns the harness, wiring it with the pending agent on first use.
    pub fn harness(&mut self) -> &TestHarness {
        let pending = self.pending_agent.take();
        self.harness.get_or_insert_with(|| {
            TestHarness::new(pending.unwrap_or_else(|| ScriptedAgent::replying("Done.")))
        })
    }

    /// Resolves the conversation the scenario is about.
    ///
    /// # Errors
    ///
    /// Returns an error when no conversation can be identified.
    pub fn current_conversation(&mut self) -> Result<ConversationId, eyre::Report> {
        if let Some(id) = self.conversation {
            return Ok(id);
        }
        let user = self.user.clone();
        let owned = run_async(self.harness().conversations.list_by_owner(&user))
            .map_err(|err| eyre::eyre!("listing conversations failed: {err}"))?;
        owned
            .first()
            .map(|conversation| conversation.id())
            .ok_or_else(|| eyre::eyre!("user owns no conversation"))
    }
}

impl Default for ChatWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ChatWorld {
    ChatWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
