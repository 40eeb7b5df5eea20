//! Settlement state machine scenario tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::Books;
use crate::booking::service::{
    CATEGORY_ROOM_RENT, SUB_ADVANCE, SUB_CHECKOUT, SUB_COLLECTION,
};
use crate::booking::{
    AddOn, AdvancePayment, BookingStatus, CheckoutInput, CollectPaymentInput, CreateBookingInput,
    LedgerTransfer, PaymentType, RefundInput, SettlementError, SettlementService,
};
use crate::collab::{NoKitchen, NoopAudit};
use crate::daybook::{Channel, EntryKind, LedgerEntry};

use folio_shared::types::BookingId;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, day).unwrap()
}

fn create(
    books: &mut Books,
    room_rent: Decimal,
    advance: Option<AdvancePayment>,
) -> BookingId {
    SettlementService::create(
        books,
        CreateBookingInput {
            guest_name: "A. Guest".to_string(),
            agent_name: None,
            room_rent,
            check_in: d(1),
            check_out: d(3),
            payment_type: PaymentType::PayAtCheckIn,
            advance,
        },
        "manager",
        &NoopAudit,
    )
    .unwrap()
}

fn collect(books: &mut Books, id: BookingId, amount: Decimal, mode: Channel) {
    SettlementService::collect_payment(
        books,
        id,
        CollectPaymentInput {
            amount,
            mode,
            date: d(2),
        },
        "manager",
        &NoopAudit,
    )
    .unwrap()
}

fn checkout_input(mode: Channel) -> CheckoutInput {
    CheckoutInput {
        date: d(3),
        kot_amount: Decimal::ZERO,
        add_ons: Vec::new(),
        mode,
        ledger_transfer: None,
    }
}

fn booking_entries<'a>(books: &'a Books, reference: &str) -> Vec<&'a LedgerEntry> {
    books
        .daybook()
        .iter()
        .filter(|e| e.reference.as_deref() == Some(reference))
        .collect()
}

fn room_rent_total(books: &Books, reference: &str) -> Decimal {
    booking_entries(books, reference)
        .iter()
        .filter(|e| e.kind == EntryKind::Income && e.category == CATEGORY_ROOM_RENT)
        .map(|e| e.amount)
        .sum()
}

#[test]
fn scenario_a_pending_partial_collected() {
    let mut books = Books::new();
    let id = create(&mut books, dec!(5000), None);

    let booking = books.booking(id).unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.status, booking.derived_status());

    collect(&mut books, id, dec!(2000), Channel::Cash);
    let booking = books.booking(id).unwrap();
    assert_eq!(booking.status, BookingStatus::Partial);
    assert_eq!(booking.status, booking.derived_status());
    let reference = booking.reference.clone();
    let entries = booking_entries(&books, &reference);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, dec!(2000));
    assert_eq!(entries[0].sub_category.as_deref(), Some(SUB_COLLECTION));

    collect(&mut books, id, dec!(3000), Channel::Cash);
    let booking = books.booking(id).unwrap();
    assert_eq!(booking.status, BookingStatus::Collected);
    assert_eq!(booking.pending(), Decimal::ZERO);
}

#[test]
fn scenario_b_checkout_grows_total_and_settles() {
    let mut books = Books::new();
    let id = create(
        &mut books,
        dec!(5000),
        Some(AdvancePayment {
            amount: dec!(5000),
            date: d(1),
            mode: Channel::Cash,
        }),
    );
    assert_eq!(books.booking(id).unwrap().status, BookingStatus::Collected);

    let outcome = SettlementService::checkout(
        &mut books,
        id,
        CheckoutInput {
            kot_amount: dec!(500),
            add_ons: vec![AddOn {
                name: "Heater".to_string(),
                amount: dec!(1000),
            }],
            ..checkout_input(Channel::Cash)
        },
        "manager",
        &mut NoKitchen,
        &NoopAudit,
    )
    .unwrap();

    let booking = books.booking(id).unwrap();
    assert_eq!(booking.total_amount, dec!(6500));
    assert_eq!(booking.balance_received, dec!(1500));
    assert_eq!(booking.status, BookingStatus::Collected);
    assert_eq!(booking.status, booking.derived_status());
    assert_eq!(outcome.collected, dec!(1500));
    assert_eq!(outcome.total_amount, dec!(6500));

    // The 1500 collected was exactly KOT 500 + add-on 1000, so no
    // room-rent entry beyond the advance may exist.
    let reference = booking.reference.clone();
    assert_eq!(room_rent_total(&books, &reference), dec!(5000));
    let entries = booking_entries(&books, &reference);
    assert_eq!(entries.len(), 3); // advance, KOT, add-ons
}

#[test]
fn scenario_c_pass_through_collect() {
    let mut books = Books::new();
    let id = create(&mut books, dec!(4000), None);

    collect(&mut books, id, Decimal::ZERO, Channel::OfficeAccount);

    let booking = books.booking(id).unwrap();
    assert_eq!(booking.status, BookingStatus::Collected);
    assert_eq!(booking.status, booking.derived_status());

    let shares: Vec<Decimal> = books.pass_through_for(id).map(|p| p.amount).collect();
    assert_eq!(shares, vec![dec!(4000)]);

    let reference = booking.reference.clone();
    assert!(booking_entries(&books, &reference).is_empty());
}

#[test]
fn pass_through_checkout_emits_no_room_rent() {
    let mut books = Books::new();
    let id = create(&mut books, dec!(3000), None);

    let outcome = SettlementService::checkout(
        &mut books,
        id,
        checkout_input(Channel::OfficeAccount),
        "manager",
        &mut NoKitchen,
        &NoopAudit,
    )
    .unwrap();

    let booking = books.booking(id).unwrap();
    assert_eq!(booking.status, BookingStatus::Collected);
    assert_eq!(outcome.pass_through_share, Some(dec!(3000)));
    let reference = booking.reference.clone();
    assert_eq!(room_rent_total(&books, &reference), Decimal::ZERO);
}

#[test]
fn checkout_is_not_repeatable() {
    let mut books = Books::new();
    let id = create(&mut books, dec!(2000), None);

    SettlementService::checkout(
        &mut books,
        id,
        checkout_input(Channel::Cash),
        "manager",
        &mut NoKitchen,
        &NoopAudit,
    )
    .unwrap();
    let entries_after_first = books.daybook().len();

    let second = SettlementService::checkout(
        &mut books,
        id,
        checkout_input(Channel::Cash),
        "manager",
        &mut NoKitchen,
        &NoopAudit,
    );
    assert!(matches!(second, Err(SettlementError::AlreadyCheckedOut(_))));
    assert_eq!(books.daybook().len(), entries_after_first);
}

#[test]
fn ledger_transfer_clamps_and_tracks_remainder_implicitly() {
    let mut books = Books::new();
    let id = create(
        &mut books,
        dec!(5000),
        Some(AdvancePayment {
            amount: dec!(2000),
            date: d(1),
            mode: Channel::Cash,
        }),
    );

    SettlementService::checkout(
        &mut books,
        id,
        CheckoutInput {
            ledger_transfer: Some(LedgerTransfer {
                collect_amount: dec!(1000),
            }),
            ..checkout_input(Channel::BankTransfer)
        },
        "manager",
        &mut NoKitchen,
        &NoopAudit,
    )
    .unwrap();

    let booking = books.booking(id).unwrap();
    assert_eq!(booking.payment_type, PaymentType::Ledger);
    assert_eq!(booking.balance_received, dec!(1000));
    assert_eq!(booking.status, BookingStatus::Partial);
    assert_eq!(booking.status, booking.derived_status());
    // The untransferred remainder is only the arithmetic difference.
    assert_eq!(booking.pending(), dec!(2000));
    assert!(booking.remarks.contains("2000 moved to agent ledger"));

    let reference = booking.reference.clone();
    let checkout_entry: Vec<_> = booking_entries(&books, &reference)
        .into_iter()
        .filter(|e| e.sub_category.as_deref() == Some(SUB_CHECKOUT))
        .collect();
    assert_eq!(checkout_entry.len(), 1);
    assert_eq!(checkout_entry[0].amount, dec!(1000));
}

#[test]
fn ledger_transfer_overshoot_is_clamped_to_balance() {
    let mut books = Books::new();
    let id = create(&mut books, dec!(1500), None);

    SettlementService::checkout(
        &mut books,
        id,
        CheckoutInput {
            ledger_transfer: Some(LedgerTransfer {
                collect_amount: dec!(99999),
            }),
            ..checkout_input(Channel::Cash)
        },
        "manager",
        &mut NoKitchen,
        &NoopAudit,
    )
    .unwrap();

    let booking = books.booking(id).unwrap();
    assert_eq!(booking.balance_received, dec!(1500));
    assert_eq!(booking.status, BookingStatus::Collected);
}

#[test]
fn collect_on_collected_booking_fails() {
    let mut books = Books::new();
    let id = create(
        &mut books,
        dec!(1000),
        Some(AdvancePayment {
            amount: dec!(1000),
            date: d(1),
            mode: Channel::Card,
        }),
    );

    let result = SettlementService::collect_payment(
        &mut books,
        id,
        CollectPaymentInput {
            amount: dec!(100),
            mode: Channel::Cash,
            date: d(2),
        },
        "manager",
        &NoopAudit,
    );
    assert!(matches!(result, Err(SettlementError::AlreadyCollected(_))));
}

#[test]
fn collection_is_exempt_from_dedup() {
    let mut books = Books::new();
    let id = create(&mut books, dec!(5000), None);

    // Two collections on the same day are both legitimate
    collect(&mut books, id, dec!(1000), Channel::Cash);
    collect(&mut books, id, dec!(1000), Channel::Cash);

    let reference = books.booking(id).unwrap().reference.clone();
    assert_eq!(booking_entries(&books, &reference).len(), 2);
}

#[test]
fn advance_entry_dedups_on_retry_key() {
    let mut books = Books::new();
    let id = create(
        &mut books,
        dec!(2000),
        Some(AdvancePayment {
            amount: dec!(500),
            date: d(1),
            mode: Channel::Cash,
        }),
    );
    let reference = books.booking(id).unwrap().reference.clone();
    assert!(books.daybook().contains(d(1), &reference, SUB_ADVANCE));
}

#[test]
fn cancel_then_refund_deletes_income_and_emits_expense() {
    let mut books = Books::new();
    let id = create(
        &mut books,
        dec!(3000),
        Some(AdvancePayment {
            amount: dec!(1000),
            date: d(1),
            mode: Channel::Cash,
        }),
    );

    SettlementService::cancel(&mut books, id, d(2), "guest no-show", "manager", &NoopAudit)
        .unwrap();
    assert_eq!(books.booking(id).unwrap().status, BookingStatus::Cancelled);

    SettlementService::refund(
        &mut books,
        id,
        RefundInput {
            amount: dec!(1000),
            date: d(2),
            mode: Channel::Cash,
            delete_original_entries: true,
        },
        "manager",
        &NoopAudit,
    )
    .unwrap();

    let reference = books.booking(id).unwrap().reference.clone();
    let entries = booking_entries(&books, &reference);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::Expense);
    assert_eq!(entries[0].amount, dec!(1000));
}

#[test]
fn refund_requires_cancelled() {
    let mut books = Books::new();
    let id = create(&mut books, dec!(3000), None);

    let result = SettlementService::refund(
        &mut books,
        id,
        RefundInput {
            amount: dec!(100),
            date: d(2),
            mode: Channel::Cash,
            delete_original_entries: false,
        },
        "manager",
        &NoopAudit,
    );
    assert!(matches!(
        result,
        Err(SettlementError::RefundRequiresCancelled(_))
    ));
}

#[test]
fn terminal_states_reject_settlement() {
    let mut books = Books::new();
    let id = create(&mut books, dec!(3000), None);
    SettlementService::reschedule(&mut books, id, d(2), "moved to July", "manager", &NoopAudit)
        .unwrap();

    let result = SettlementService::checkout(
        &mut books,
        id,
        checkout_input(Channel::Cash),
        "manager",
        &mut NoKitchen,
        &NoopAudit,
    );
    assert!(matches!(result, Err(SettlementError::Terminal { .. })));

    // A second terminal transition is also rejected
    let result = SettlementService::cancel(&mut books, id, d(2), "", "manager", &NoopAudit);
    assert!(matches!(result, Err(SettlementError::Terminal { .. })));
}

#[test]
fn create_validates_amounts_and_dates() {
    let mut books = Books::new();
    let result = SettlementService::create(
        &mut books,
        CreateBookingInput {
            guest_name: "A. Guest".to_string(),
            agent_name: None,
            room_rent: dec!(0),
            check_in: d(1),
            check_out: d(3),
            payment_type: PaymentType::Prepaid,
            advance: None,
        },
        "manager",
        &NoopAudit,
    );
    assert!(matches!(result, Err(SettlementError::NonPositiveAmount(_))));

    let result = SettlementService::create(
        &mut books,
        CreateBookingInput {
            guest_name: "A. Guest".to_string(),
            agent_name: None,
            room_rent: dec!(1000),
            check_in: d(3),
            check_out: d(1),
            payment_type: PaymentType::Prepaid,
            advance: None,
        },
        "manager",
        &NoopAudit,
    );
    assert!(matches!(
        result,
        Err(SettlementError::InvalidStayDates { .. })
    ));
}

#[test]
fn references_are_sequential() {
    let mut books = Books::new();
    let a = create(&mut books, dec!(1000), None);
    let b = create(&mut books, dec!(1000), None);
    assert_eq!(books.booking(a).unwrap().reference, "BK-0001");
    assert_eq!(books.booking(b).unwrap().reference, "BK-0002");
}

#[test]
fn office_advance_becomes_pass_through() {
    let mut books = Books::new();
    let id = create(
        &mut books,
        dec!(2000),
        Some(AdvancePayment {
            amount: dec!(800),
            date: d(1),
            mode: Channel::OfficeAccount,
        }),
    );

    let booking = books.booking(id).unwrap();
    assert_eq!(booking.advance_received, dec!(800));
    let reference = booking.reference.clone();
    assert!(booking_entries(&books, &reference).is_empty());
    let shares: Vec<Decimal> = books.pass_through_for(id).map(|p| p.amount).collect();
    assert_eq!(shares, vec![dec!(800)]);
}
