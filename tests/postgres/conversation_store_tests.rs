//! Conversation persistence against `PostgreSQL`.

use crate::postgres::helpers::{StoreContext, at, stores};
use rstest::rstest;
use taskchat::conversation::{
    domain::{
        Conversation, ConversationId, ConversationTitle, MessageText, NewConversation, UserId,
    },
    ports::ConversationStore,
};

fn new_conversation(owner: &UserId, first_message: &str, minutes: i64) -> NewConversation {
    let text = MessageText::parse(first_message).expect("valid message");
    NewConversation::new(
        owner.clone(),
        ConversationTitle::from_first_message(&text),
        &at(minutes),
    )
}

#[rstest]
fn create_assigns_ids_and_round_trips(stores: StoreContext) {
    let alice = UserId::new("alice");

    let first = stores
        .runtime
        .block_on(
            stores
                .conversations
                .create(new_conversation(&alice, "Plan the week", 0)),
        )
        .expect("create");
    let second = stores
        .runtime
        .block_on(
            stores
                .conversations
                .create(new_conversation(&alice, "Groceries", 1)),
        )
        .expect("create");
    let found = stores
        .runtime
        .block_on(stores.conversations.find_by_id(first.id()))
        .expect("lookup")
        .expect("conversation exists");

    assert!(second.id() > first.id());
    assert_eq!(found, first);
    assert_eq!(found.owner_id(), &alice);
    assert_eq!(found.title().as_str(), "Plan the week");
    assert_eq!(found.created_at(), at(0).0);
}

#[rstest]
fn find_by_id_returns_none_for_missing(stores: StoreContext) {
    let found = stores
        .runtime
        .block_on(stores.conversations.find_by_id(ConversationId::new(4242)))
        .expect("lookup");

    assert!(found.is_none());
}

#[rstest]
fn list_by_owner_is_newest_first_with_id_tie_break(stores: StoreContext) {
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");
    let create = |conversation| {
        stores
            .runtime
            .block_on(stores.conversations.create(conversation))
            .expect("create")
    };

    let oldest = create(new_conversation(&alice, "oldest", 0));
    let tied_first = create(new_conversation(&alice, "tied first", 5));
    let tied_second = create(new_conversation(&alice, "tied second", 5));
    create(new_conversation(&bob, "not alice's", 10));

    let listed = stores
        .runtime
        .block_on(stores.conversations.list_by_owner(&alice))
        .expect("list");
    let ids: Vec<ConversationId> = listed.iter().map(Conversation::id).collect();

    assert_eq!(ids, vec![tied_second.id(), tied_first.id(), oldest.id()]);
}

#[rstest]
fn long_subject_identifiers_are_stored(stores: StoreContext) {
    let owner = UserId::new("u".repeat(300));

    let created = stores
        .runtime
        .block_on(
            stores
                .conversations
                .create(new_conversation(&owner, "hello", 0)),
        )
        .expect("create");
    let listed = stores
        .runtime
        .block_on(stores.conversations.list_by_owner(&owner))
        .expect("list");

    assert_eq!(listed, vec![created]);
}
