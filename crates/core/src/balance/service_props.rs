//! Property tests for the carry-forward replay laws.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::Books;
use crate::daybook::{Channel, EntryInput, EntryKind};

use super::service::BalanceService;

#[derive(Debug, Clone)]
struct GenEntry {
    day: u32,
    amount: Decimal,
    income: bool,
    cash: bool,
}

fn entry_strategy() -> impl Strategy<Value = GenEntry> {
    (1u32..=27, 1i64..1_000_000, any::<bool>(), any::<bool>()).prop_map(
        |(day, cents, income, cash)| GenEntry {
            day,
            amount: Decimal::new(cents, 2),
            income,
            cash,
        },
    )
}

fn entries_strategy(max_len: usize) -> impl Strategy<Value = Vec<GenEntry>> {
    prop::collection::vec(entry_strategy(), 0..=max_len)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
}

fn build_books(opening_cash: Decimal, opening_bank: Decimal, entries: &[GenEntry]) -> Books {
    let mut books = Books::new();
    BalanceService::set_balance(&mut books, day(1), opening_cash, opening_bank);
    for entry in entries {
        books.daybook_mut().append(EntryInput {
            date: day(entry.day),
            kind: if entry.income {
                EntryKind::Income
            } else {
                EntryKind::Expense
            },
            category: "Prop".to_string(),
            sub_category: None,
            amount: entry.amount,
            channel: if entry.cash {
                Channel::Cash
            } else {
                Channel::BankTransfer
            },
            reference: None,
            description: String::new(),
        });
    }
    books
}

fn opening_strategy() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Closing of day D equals opening of day D+1 whenever no explicit
    /// checkpoint sits at D+1 (carry-forward continuity).
    #[test]
    fn prop_carry_forward_continuity(
        opening_cash in opening_strategy(),
        opening_bank in opening_strategy(),
        entries in entries_strategy(40),
        probe_day in 1u32..=27,
    ) {
        let books = build_books(opening_cash, opening_bank, &entries);

        let closing = BalanceService::day_position(&books, day(probe_day));
        let next = BalanceService::day_position(&books, day(probe_day + 1));

        prop_assert_eq!(closing.cash_closing, next.cash_opening);
        prop_assert_eq!(closing.bank_closing, next.bank_opening);
    }

    /// Closing equals opening plus income minus expense, per bucket.
    #[test]
    fn prop_closing_is_opening_plus_net(
        opening_cash in opening_strategy(),
        opening_bank in opening_strategy(),
        entries in entries_strategy(40),
        probe_day in 1u32..=28,
    ) {
        let books = build_books(opening_cash, opening_bank, &entries);
        let position = BalanceService::day_position(&books, day(probe_day));

        prop_assert_eq!(
            position.cash_closing,
            position.cash_opening + position.cash_income - position.cash_expense
        );
        prop_assert_eq!(
            position.bank_closing,
            position.bank_opening + position.bank_income - position.bank_expense
        );
    }

    /// The replayed opening equals the anchor plus an independently
    /// computed signed sum of every entry before the probe day.
    #[test]
    fn prop_opening_matches_independent_sum(
        opening_cash in opening_strategy(),
        opening_bank in opening_strategy(),
        entries in entries_strategy(40),
        probe_day in 2u32..=28,
    ) {
        let books = build_books(opening_cash, opening_bank, &entries);

        let expected_cash: Decimal = entries
            .iter()
            .filter(|e| e.day < probe_day && e.cash)
            .map(|e| if e.income { e.amount } else { -e.amount })
            .sum();
        let expected_bank: Decimal = entries
            .iter()
            .filter(|e| e.day < probe_day && !e.cash)
            .map(|e| if e.income { e.amount } else { -e.amount })
            .sum();

        let (cash, bank) = BalanceService::opening(&books, day(probe_day));
        prop_assert_eq!(cash, opening_cash + expected_cash);
        prop_assert_eq!(bank, opening_bank + expected_bank);
    }

    /// Snapshotting the same day twice writes the same checkpoint.
    #[test]
    fn prop_snapshot_idempotent(
        opening_cash in opening_strategy(),
        opening_bank in opening_strategy(),
        entries in entries_strategy(40),
        snapshot_day in 1u32..=27,
    ) {
        let mut books = build_books(opening_cash, opening_bank, &entries);

        let first = BalanceService::snapshot_closing(&mut books, day(snapshot_day));
        let second = BalanceService::snapshot_closing(&mut books, day(snapshot_day));
        prop_assert_eq!(first, second);
    }

    /// After recalculating from day 1, every checkpoint agrees with a
    /// fresh replay: re-running the recalculation changes nothing.
    #[test]
    fn prop_recalculate_is_idempotent(
        opening_cash in opening_strategy(),
        opening_bank in opening_strategy(),
        entries in entries_strategy(40),
        checkpoint_day in 5u32..=20,
    ) {
        let mut books = build_books(opening_cash, opening_bank, &entries);
        BalanceService::set_balance(&mut books, day(checkpoint_day), Decimal::ZERO, Decimal::ZERO);

        BalanceService::recalculate_from(&mut books, day(2));
        let after_first = *books.checkpoint_on(day(checkpoint_day)).unwrap();
        BalanceService::recalculate_from(&mut books, day(2));
        let after_second = *books.checkpoint_on(day(checkpoint_day)).unwrap();

        prop_assert_eq!(after_first, after_second);
    }
}
