// Message handler tests - dispatch, conservation, and rollback

use chainbank::account::{Account, AccountStore, Address, MemoryAccountStore};
use chainbank::coin::{Coins, Denom};
use chainbank::invariant::InvariantRegistry;
use chainbank::keeper::{Input, KeeperError, Output};
use chainbank::msg::{DispatchOutcome, Msg, MsgError, MsgSend, Router, TAG_ACTION, TAG_RECIPIENT, TAG_SENDER};
use chainbank::params::Params;

fn coins(s: &str) -> Coins {
    Coins::parse(s).unwrap()
}

fn funded(store: &mut MemoryAccountStore, balance: &str) -> Address {
    let addr = Address::generate();
    store
        .set_account(Account::with_coins(addr, coins(balance)))
        .unwrap();
    addr
}

fn router() -> Router {
    Router::new(InvariantRegistry::new(), Params::default())
}

fn total_supply(store: &MemoryAccountStore, denom: &Denom) -> u128 {
    store
        .accounts()
        .unwrap()
        .iter()
        .map(|account| account.coins().amount_of(denom))
        .sum()
}

fn tag_values<'a>(tags: &'a [chainbank::msg::Tag], key: &str) -> Vec<&'a str> {
    tags.iter()
        .filter(|tag| tag.key() == key)
        .map(|tag| tag.value())
        .collect()
}

// ============================================================================
// CONSERVATION TESTS
// ============================================================================

#[test]
fn test_committed_send_conserves_supply() {
    let mut store = MemoryAccountStore::new();
    let from = funded(&mut store, "100atom");
    let to = funded(&mut store, "20atom");
    let router = router();
    let atom = Denom::parse("atom").unwrap();

    let before = total_supply(&store, &atom);
    let msg = Msg::Send(MsgSend::new(
        vec![Input::new(from, coins("40atom"))],
        vec![Output::new(to, coins("40atom"))],
    ));

    let outcome = router.dispatch(&mut store, &msg);

    assert!(outcome.is_committed());
    assert_eq!(total_supply(&store, &atom), before);
    assert_eq!(router.keeper().coins(&store, &from).unwrap(), coins("60atom"));
    assert_eq!(router.keeper().coins(&store, &to).unwrap(), coins("60atom"));
}

// ============================================================================
// REJECTION TESTS
// ============================================================================

#[test]
fn test_sum_mismatch_is_rejected_before_any_state_access() {
    let mut store = MemoryAccountStore::new();
    let from = funded(&mut store, "100atom");
    let to = funded(&mut store, "20atom");
    let router = router();

    let msg = Msg::Send(MsgSend::new(
        vec![Input::new(from, coins("100atom"))],
        vec![Output::new(to, coins("90atom"))],
    ));

    let outcome = router.dispatch(&mut store, &msg);

    assert!(matches!(
        outcome,
        DispatchOutcome::Rejected(MsgError::InputOutputMismatch)
    ));
    assert_eq!(router.keeper().coins(&store, &from).unwrap(), coins("100atom"));
    assert_eq!(router.keeper().coins(&store, &to).unwrap(), coins("20atom"));
}

#[test]
fn test_failed_multisend_rolls_back_every_leg() {
    let mut store = MemoryAccountStore::new();
    let a = funded(&mut store, "50atom");
    let b = funded(&mut store, "30atom");
    let c = funded(&mut store, "10atom");
    let d = funded(&mut store, "0stake");
    let router = router();

    // Sums match, but the second input overdrafts at execution time:
    // nothing may survive, including the first input's debit.
    let msg = Msg::Send(MsgSend::new(
        vec![
            Input::new(a, coins("50atom")),
            Input::new(b, coins("40atom")),
            Input::new(c, coins("10atom")),
        ],
        vec![Output::new(d, coins("100atom"))],
    ));

    let outcome = router.dispatch(&mut store, &msg);

    assert!(matches!(
        outcome,
        DispatchOutcome::Rejected(MsgError::Keeper(KeeperError::NegativeBalance { .. }))
    ));
    assert_eq!(router.keeper().coins(&store, &a).unwrap(), coins("50atom"));
    assert_eq!(router.keeper().coins(&store, &b).unwrap(), coins("30atom"));
    assert_eq!(router.keeper().coins(&store, &c).unwrap(), coins("10atom"));
    assert!(router.keeper().coins(&store, &d).unwrap().is_empty());
}

#[test]
fn test_send_to_unknown_account_rolls_back_the_debit() {
    let mut store = MemoryAccountStore::new();
    let from = funded(&mut store, "100atom");
    let router = router();

    let msg = Msg::Send(MsgSend::new(
        vec![Input::new(from, coins("40atom"))],
        vec![Output::new(Address::generate(), coins("40atom"))],
    ));

    let outcome = router.dispatch(&mut store, &msg);

    assert!(matches!(
        outcome,
        DispatchOutcome::Rejected(MsgError::Keeper(KeeperError::AccountNotFound { .. }))
    ));
    assert_eq!(router.keeper().coins(&store, &from).unwrap(), coins("100atom"));
}

// ============================================================================
// TAG TESTS
// ============================================================================

#[test]
fn test_plain_send_emits_send_action() {
    let mut store = MemoryAccountStore::new();
    let from = funded(&mut store, "100atom");
    let to = funded(&mut store, "0stake");
    let router = router();

    let msg = Msg::Send(MsgSend::new(
        vec![Input::new(from, coins("40atom"))],
        vec![Output::new(to, coins("40atom"))],
    ));

    match router.dispatch(&mut store, &msg) {
        DispatchOutcome::Committed { tags } => {
            assert_eq!(tag_values(&tags, TAG_ACTION), vec!["send"]);
            assert_eq!(tag_values(&tags, TAG_SENDER), vec![from.to_string()]);
            assert_eq!(tag_values(&tags, TAG_RECIPIENT), vec![to.to_string()]);
        }
        other => panic!("expected commit, got {other:?}"),
    }
}

#[test]
fn test_multisend_deduplicates_party_tags() {
    let mut store = MemoryAccountStore::new();
    let from = funded(&mut store, "100atom");
    let to = funded(&mut store, "0stake");
    let other = funded(&mut store, "0stake");
    let router = router();

    // The same sender appears twice; the tag must appear once.
    let msg = Msg::Send(MsgSend::new(
        vec![
            Input::new(from, coins("30atom")),
            Input::new(from, coins("10atom")),
        ],
        vec![
            Output::new(to, coins("25atom")),
            Output::new(other, coins("15atom")),
        ],
    ));

    match router.dispatch(&mut store, &msg) {
        DispatchOutcome::Committed { tags } => {
            assert_eq!(tag_values(&tags, TAG_ACTION), vec!["multisend"]);
            assert_eq!(tag_values(&tags, TAG_SENDER), vec![from.to_string()]);
            assert_eq!(
                tag_values(&tags, TAG_RECIPIENT),
                vec![to.to_string(), other.to_string()]
            );
        }
        other => panic!("expected commit, got {other:?}"),
    }
}
