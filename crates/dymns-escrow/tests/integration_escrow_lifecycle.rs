//! Integration test: escrow across several open orders and denominations
//!
//! DEPOSIT → PARTIAL RELEASE → CONSERVATION CHECK

use dymns_escrow::{Bank, BankKeeper, EscrowConservation, EscrowLedger};
use dymns_types::{dummy, DymnsError, MemStorage, Money};
use rust_decimal::Decimal;

fn coin(denom: &str, n: i64) -> Money {
    Money::new(denom, Decimal::new(n, 0))
}

#[test]
fn escrow_tracks_open_orders_per_denom() {
    let mut store = MemStorage::new();
    let bank = Bank::new();
    let escrow = EscrowLedger::new(&bank);
    let alice = dummy::address(1);
    let bob = dummy::address(2);
    let seller = dummy::address(3);

    bank.mint(&mut store, &alice, &coin("adym", 100)).unwrap();
    bank.mint(&mut store, &bob, &coin("adym", 50)).unwrap();
    bank.mint(&mut store, &bob, &coin("uusdc", 10)).unwrap();

    // three open orders
    escrow.deposit(&mut store, &alice, &coin("adym", 30)).unwrap();
    escrow.deposit(&mut store, &bob, &coin("adym", 20)).unwrap();
    escrow.deposit(&mut store, &bob, &coin("uusdc", 4)).unwrap();

    let mut open = EscrowConservation::new();
    for price in [coin("adym", 30), coin("adym", 20), coin("uusdc", 4)] {
        open.record_open_order(&price);
    }
    open.verify_all(&escrow.held_all(&store).unwrap()).unwrap();

    // alice's order matches, bob's uusdc order is cancelled
    escrow.withdraw(&mut store, &seller, &coin("adym", 30)).unwrap();
    escrow.withdraw(&mut store, &bob, &coin("uusdc", 4)).unwrap();

    let mut open = EscrowConservation::new();
    open.record_open_order(&coin("adym", 20));
    open.verify_all(&escrow.held_all(&store).unwrap()).unwrap();
    assert_eq!(open.order_count(), 1);

    assert_eq!(bank.balance(&store, &seller, "adym").unwrap(), Decimal::new(30, 0));
    assert_eq!(bank.balance(&store, &alice, "adym").unwrap(), Decimal::new(70, 0));
    assert_eq!(bank.balance(&store, &bob, "uusdc").unwrap(), Decimal::new(10, 0));
    assert_eq!(escrow.held(&store, "uusdc").unwrap(), Decimal::ZERO);
}

#[test]
fn releasing_more_than_held_fails_without_effect() {
    let mut store = MemStorage::new();
    let bank = Bank::new();
    let escrow = EscrowLedger::new(&bank);
    let alice = dummy::address(1);
    bank.mint(&mut store, &alice, &coin("adym", 10)).unwrap();
    escrow.deposit(&mut store, &alice, &coin("adym", 10)).unwrap();
    let before = store.clone();

    let err = escrow.withdraw(&mut store, &alice, &coin("adym", 11)).unwrap_err();

    assert!(matches!(err, DymnsError::InsufficientFunds { .. }), "{err}");
    assert_eq!(store, before);
}

#[test]
fn leaked_escrow_is_reported() {
    let mut store = MemStorage::new();
    let bank = Bank::new();
    let escrow = EscrowLedger::new(&bank);
    bank.mint(&mut store, bank.module_address(), &coin("adym", 5)).unwrap();

    let err = EscrowConservation::new()
        .verify_all(&escrow.held_all(&store).unwrap())
        .unwrap_err();
    assert!(matches!(err, DymnsError::EscrowInvariantViolation { .. }), "{err}");
}

#[test]
#[should_panic(expected = "escrow deposit must be positive")]
fn zero_deposit_is_a_fault() {
    let mut store = MemStorage::new();
    let bank = Bank::new();
    EscrowLedger::new(&bank)
        .deposit(&mut store, &dummy::address(1), &coin("adym", 0))
        .unwrap();
}
