//! The daybook store: append, query, de-duplicate, cascade-delete.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use folio_shared::types::{EntryId, round_currency};

use super::types::{EntryFilter, EntryInput, EntryKind, LedgerEntry};

/// Append-only store of dated income/expense records.
///
/// Entries keep insertion order within and across days; chronological
/// replay sorts by date while preserving insertion order per day.
#[derive(Debug, Default, Clone)]
pub struct Daybook {
    entries: Vec<LedgerEntry>,
}

impl Daybook {
    /// Creates an empty daybook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one entry, rounding the amount to 2 decimal places.
    ///
    /// Non-positive amounts are silently skipped and `None` is returned;
    /// callers throughout the system treat zero-amount facts as
    /// "nothing happened", not as errors.
    pub fn append(&mut self, input: EntryInput) -> Option<EntryId> {
        let amount = round_currency(input.amount);
        if amount <= Decimal::ZERO {
            debug!(
                category = %input.category,
                reference = input.reference.as_deref().unwrap_or("-"),
                "skipping non-positive daybook entry"
            );
            return None;
        }

        let entry = LedgerEntry {
            id: EntryId::new(),
            date: input.date,
            kind: input.kind,
            category: input.category,
            sub_category: input.sub_category,
            amount,
            channel: input.channel,
            reference: input.reference,
            description: input.description,
        };
        let id = entry.id;
        self.entries.push(entry);
        Some(id)
    }

    /// Returns true if an entry already exists for the de-duplication
    /// key `(date, reference, sub_category)`.
    #[must_use]
    pub fn contains(&self, date: NaiveDate, reference: &str, sub_category: &str) -> bool {
        self.entries.iter().any(|entry| {
            entry.date == date
                && entry.reference.as_deref() == Some(reference)
                && entry.sub_category.as_deref() == Some(sub_category)
        })
    }

    /// All entries for one day, in insertion order.
    pub fn entries_on(&self, date: NaiveDate) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(move |entry| entry.date == date)
    }

    /// All entries passing the filter, in insertion order.
    pub fn entries_matching<'a>(
        &'a self,
        filter: &'a EntryFilter,
    ) -> impl Iterator<Item = &'a LedgerEntry> {
        self.entries.iter().filter(move |entry| filter.matches(entry))
    }

    /// Every entry in the book, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter()
    }

    /// Deletes entries linked to a reference, optionally narrowed to one
    /// category. Returns the number of entries removed.
    ///
    /// Used for cascades: deleting a settlement removes its paired
    /// entry, deleting a booking's financial trail removes everything it
    /// emitted.
    pub fn delete_by_reference(&mut self, reference: &str, category: Option<&str>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            entry.reference.as_deref() != Some(reference)
                || category.is_some_and(|c| entry.category != c)
        });
        before - self.entries.len()
    }

    /// Deletes all income entries linked to a reference. Returns the
    /// number of entries removed.
    pub fn delete_income_by_reference(&mut self, reference: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            entry.kind != EntryKind::Income || entry.reference.as_deref() != Some(reference)
        });
        before - self.entries.len()
    }

    /// Number of entries in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the book holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
