//! Replay and snapshot operations.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use tracing::{info, warn};

use folio_shared::types::round_currency;

use crate::Books;
use crate::daybook::{EntryKind, LedgerEntry};

use super::types::{BalanceCheckpoint, DayPosition};

/// Cash/bank running totals during a replay.
#[derive(Debug, Clone, Copy, Default)]
struct Buckets {
    cash: Decimal,
    bank: Decimal,
}

impl Buckets {
    fn apply(&mut self, entry: &LedgerEntry) {
        let signed = match entry.kind {
            EntryKind::Income => entry.amount,
            EntryKind::Expense => -entry.amount,
        };
        if entry.channel.is_cash() {
            self.cash += signed;
        } else {
            self.bank += signed;
        }
    }
}

/// Balance carry-forward engine.
pub struct BalanceService;

impl BalanceService {
    /// Computes the full position for one day: opening, the day's own
    /// income/expense per bucket, and closing.
    #[must_use]
    pub fn day_position(books: &Books, date: NaiveDate) -> DayPosition {
        let (cash_opening, bank_opening) = Self::opening(books, date);

        let mut cash_income = Decimal::ZERO;
        let mut bank_income = Decimal::ZERO;
        let mut cash_expense = Decimal::ZERO;
        let mut bank_expense = Decimal::ZERO;
        for entry in books.daybook().entries_on(date) {
            match (entry.kind, entry.channel.is_cash()) {
                (EntryKind::Income, true) => cash_income += entry.amount,
                (EntryKind::Income, false) => bank_income += entry.amount,
                (EntryKind::Expense, true) => cash_expense += entry.amount,
                (EntryKind::Expense, false) => bank_expense += entry.amount,
            }
        }

        DayPosition {
            date,
            cash_opening,
            bank_opening,
            cash_income,
            bank_income,
            cash_expense,
            bank_expense,
            cash_closing: cash_opening + cash_income - cash_expense,
            bank_closing: bank_opening + bank_income - bank_expense,
        }
    }

    /// The opening position for a date.
    ///
    /// An explicit checkpoint at the date wins; otherwise the most
    /// recent earlier checkpoint is replayed forward, and with no
    /// checkpoint at all the replay starts from zero.
    #[must_use]
    pub fn opening(books: &Books, date: NaiveDate) -> (Decimal, Decimal) {
        if let Some(checkpoint) = books.checkpoint_on(date) {
            return (checkpoint.cash, checkpoint.bank);
        }
        Self::replayed_opening(books, date)
    }

    /// Upserts an explicit opening checkpoint for a date.
    pub fn set_balance(books: &mut Books, date: NaiveDate, cash: Decimal, bank: Decimal) {
        books.set_checkpoint(BalanceCheckpoint {
            date,
            cash: round_currency(cash),
            bank: round_currency(bank),
        });
    }

    /// Re-derives and overwrites every checkpoint at or after the date.
    ///
    /// Needed after correcting a historical entry that a later
    /// checkpoint had already frozen. O(entries since the anchor);
    /// an offline/admin operation, not a hot path. Returns the number
    /// of checkpoints rewritten.
    pub fn recalculate_from(books: &mut Books, date: NaiveDate) -> usize {
        let dates = books.checkpoint_dates_from(date);
        for checkpoint_date in &dates {
            let (cash, bank) = Self::replayed_opening(books, *checkpoint_date);
            books.set_checkpoint(BalanceCheckpoint {
                date: *checkpoint_date,
                cash,
                bank,
            });
        }
        info!(from = %date, rewritten = dates.len(), "recalculated checkpoints");
        dates.len()
    }

    /// Snapshots today's computed closing as tomorrow's opening
    /// checkpoint. Idempotent: re-running re-derives and overwrites.
    ///
    /// Returns `None` only when tomorrow is unrepresentable.
    pub fn snapshot_closing(books: &mut Books, today: NaiveDate) -> Option<BalanceCheckpoint> {
        let Some(tomorrow) = today.checked_add_days(Days::new(1)) else {
            warn!(%today, "cannot snapshot: successor day out of range");
            return None;
        };
        let position = Self::day_position(books, today);
        let checkpoint = BalanceCheckpoint {
            date: tomorrow,
            cash: position.cash_closing,
            bank: position.bank_closing,
        };
        books.set_checkpoint(checkpoint);
        info!(
            date = %tomorrow,
            cash = %checkpoint.cash,
            bank = %checkpoint.bank,
            "snapshotted opening checkpoint"
        );
        Some(checkpoint)
    }

    /// Safety check: when the end-of-day snapshot for yesterday never
    /// ran, today has no checkpoint; re-run it. Tolerates process
    /// restarts and missed schedule firings.
    ///
    /// Returns the backfilled checkpoint, or `None` when today's
    /// checkpoint already exists.
    pub fn ensure_snapshot(books: &mut Books, today: NaiveDate) -> Option<BalanceCheckpoint> {
        if books.checkpoint_on(today).is_some() {
            return None;
        }
        let yesterday = today.checked_sub_days(Days::new(1))?;
        warn!(%today, "opening checkpoint missing; re-running snapshot");
        Self::snapshot_closing(books, yesterday)
    }

    /// Replays from the nearest checkpoint strictly before the date,
    /// ignoring any checkpoint at the date itself.
    fn replayed_opening(books: &Books, date: NaiveDate) -> (Decimal, Decimal) {
        let anchor = books.checkpoint_before(date);
        let (mut buckets, replay_from) = match anchor {
            Some(checkpoint) => (
                Buckets {
                    cash: checkpoint.cash,
                    bank: checkpoint.bank,
                },
                Some(checkpoint.date),
            ),
            None => (Buckets::default(), None),
        };

        // Entries are folded in date order; same-day entries keep
        // insertion order, which cannot change a day's sum.
        let mut window: Vec<&LedgerEntry> = books
            .daybook()
            .iter()
            .filter(|entry| {
                entry.date < date && replay_from.is_none_or(|from| entry.date >= from)
            })
            .collect();
        window.sort_by_key(|entry| entry.date);
        for entry in window {
            buckets.apply(entry);
        }
        (buckets.cash, buckets.bank)
    }
}
