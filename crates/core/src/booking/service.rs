//! Settlement operations on bookings.
//!
//! Every operation validates against freshly derived state, mutates the
//! booking, then emits daybook entries or pass-through records. Entry
//! emission is idempotent through the de-duplication key
//! `(date, reference, sub_category)`; "Collection" is the one exempt
//! sub-category because several collections per booking per day are
//! legitimate.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use folio_shared::types::{BookingId, PassThroughId, non_negative, round_currency};

use crate::Books;
use crate::collab::{AuditEvent, AuditSink, KitchenOrders, record_audit};
use crate::daybook::{EntryInput, EntryKind};

use super::error::SettlementError;
use super::types::{
    AddOn, Booking, BookingStatus, CheckoutInput, CheckoutOutcome, CollectPaymentInput,
    CreateBookingInput, PassThroughContext, PassThroughPayment, PaymentType, RefundInput,
};

/// Entry category for room income.
pub const CATEGORY_ROOM_RENT: &str = "Room Rent";
/// Entry category for kitchen-order income billed at checkout.
pub const CATEGORY_KOT: &str = "KOT";
/// Entry category for add-on income billed at checkout.
pub const CATEGORY_ADD_ONS: &str = "Add-Ons";
/// Entry category for refund expenses.
pub const CATEGORY_REFUND: &str = "Refund";

/// Sub-category for advances collected at creation.
pub const SUB_ADVANCE: &str = "Advance";
/// Sub-category for balance collections; exempt from de-duplication.
pub const SUB_COLLECTION: &str = "Collection";
/// Sub-category for the room-rent portion collected at checkout.
pub const SUB_CHECKOUT: &str = "Checkout";
/// Sub-category for manually entered kitchen-order amounts.
pub const SUB_KOT: &str = "KOT";
/// Sub-category for add-on charges.
pub const SUB_ADD_ONS: &str = "Add-Ons";
/// Sub-category for refunds.
pub const SUB_REFUND: &str = "Refund";

/// Booking settlement state machine.
pub struct SettlementService;

impl SettlementService {
    /// Creates a booking and, when an advance was collected through a
    /// direct channel, emits its "Room Rent"/"Advance" entry. Advances
    /// through the office channel become pass-through records instead.
    pub fn create(
        books: &mut Books,
        input: CreateBookingInput,
        actor: &str,
        audit: &dyn AuditSink,
    ) -> Result<BookingId, SettlementError> {
        let room_rent = round_currency(input.room_rent);
        if room_rent <= Decimal::ZERO {
            return Err(SettlementError::NonPositiveAmount(room_rent));
        }
        if input.check_out < input.check_in {
            return Err(SettlementError::InvalidStayDates {
                check_in: input.check_in,
                check_out: input.check_out,
            });
        }
        let advance = match &input.advance {
            Some(a) => {
                let amount = round_currency(a.amount);
                if amount <= Decimal::ZERO {
                    return Err(SettlementError::NonPositiveAmount(amount));
                }
                Some((amount, a.date, a.mode))
            }
            None => None,
        };

        let id = BookingId::new();
        let reference = books.next_reference();
        let mut booking = Booking {
            id,
            reference: reference.clone(),
            guest_name: input.guest_name,
            agent_name: input.agent_name,
            room_rent,
            check_in: input.check_in,
            check_out: input.check_out,
            total_amount: room_rent,
            advance_received: advance.map_or(Decimal::ZERO, |(amount, _, _)| amount),
            advance_date: advance.map(|(_, date, _)| date),
            advance_mode: advance.map(|(_, _, mode)| mode),
            balance_received: Decimal::ZERO,
            balance_date: None,
            balance_mode: None,
            kot_amount: Decimal::ZERO,
            add_on_amount: Decimal::ZERO,
            payment_type: input.payment_type,
            status: BookingStatus::Pending,
            checked_in: false,
            checked_in_at: None,
            checked_out: false,
            checked_out_at: None,
            remarks: String::new(),
        };
        booking.status = booking.derived_status();
        let remark_date = booking.advance_date.unwrap_or(booking.check_in);
        booking.push_remark(remark_date, actor, "booking created");
        let guest_name = booking.guest_name.clone();
        books.insert_booking(booking);

        if let Some((amount, date, mode)) = advance {
            if mode.is_pass_through() {
                books.push_pass_through(PassThroughPayment {
                    id: PassThroughId::new(),
                    booking_id: id,
                    reference: reference.clone(),
                    amount,
                    sub_category: SUB_ADVANCE.to_string(),
                    date,
                    context: PassThroughContext::Collect,
                });
            } else if !books.daybook().contains(date, &reference, SUB_ADVANCE) {
                books.daybook_mut().append(EntryInput {
                    date,
                    kind: EntryKind::Income,
                    category: CATEGORY_ROOM_RENT.to_string(),
                    sub_category: Some(SUB_ADVANCE.to_string()),
                    amount,
                    channel: mode,
                    reference: Some(reference.clone()),
                    description: format!("Advance from {guest_name}"),
                });
            }
        }

        info!(%reference, "booking created");
        record_audit(
            audit,
            &AuditEvent {
                actor: actor.to_string(),
                action: "create",
                reference,
                detail: format!("room rent {room_rent}"),
            },
        );
        Ok(id)
    }

    /// Collects a balance payment.
    ///
    /// The office channel settles the entire outstanding total and
    /// records the hotel share as a pass-through payment; direct
    /// channels add the given amount and emit a "Collection" entry.
    pub fn collect_payment(
        books: &mut Books,
        id: BookingId,
        input: CollectPaymentInput,
        actor: &str,
        audit: &dyn AuditSink,
    ) -> Result<(), SettlementError> {
        let booking = books
            .booking(id)
            .ok_or_else(|| SettlementError::BookingNotFound(id.to_string()))?;
        let reference = booking.reference.clone();
        let guest_name = booking.guest_name.clone();
        if booking.status.is_terminal() {
            return Err(SettlementError::Terminal {
                reference,
                status: booking.status.to_string(),
            });
        }
        if booking.derived_status() == BookingStatus::Collected {
            return Err(SettlementError::AlreadyCollected(reference));
        }

        let collected;
        if input.mode.is_pass_through() {
            let outstanding = non_negative(booking.pending());
            let share =
                non_negative(booking.room_rent + booking.add_on_amount - booking.received());
            collected = outstanding;

            let booking = books
                .booking_mut(id)
                .ok_or_else(|| SettlementError::BookingNotFound(id.to_string()))?;
            booking.balance_received += outstanding;
            booking.balance_date = Some(input.date);
            booking.balance_mode = Some(input.mode);
            booking.status = booking.derived_status();
            booking.push_remark(
                input.date,
                actor,
                &format!("balance {outstanding} settled via {}", input.mode),
            );

            // The office's cash never touches hotel accounts; only the
            // earned share is recorded, and never as a daybook entry.
            if share > Decimal::ZERO {
                books.push_pass_through(PassThroughPayment {
                    id: PassThroughId::new(),
                    booking_id: id,
                    reference: reference.clone(),
                    amount: share,
                    sub_category: SUB_COLLECTION.to_string(),
                    date: input.date,
                    context: PassThroughContext::Collect,
                });
            }
        } else {
            let amount = round_currency(input.amount);
            if amount <= Decimal::ZERO {
                return Err(SettlementError::NonPositiveAmount(amount));
            }
            collected = amount;

            let booking = books
                .booking_mut(id)
                .ok_or_else(|| SettlementError::BookingNotFound(id.to_string()))?;
            booking.balance_received += amount;
            booking.balance_date = Some(input.date);
            booking.balance_mode = Some(input.mode);
            booking.status = booking.derived_status();
            booking.push_remark(
                input.date,
                actor,
                &format!("collected {amount} via {}", input.mode),
            );

            books.daybook_mut().append(EntryInput {
                date: input.date,
                kind: EntryKind::Income,
                category: CATEGORY_ROOM_RENT.to_string(),
                sub_category: Some(SUB_COLLECTION.to_string()),
                amount,
                channel: input.mode,
                reference: Some(reference.clone()),
                description: format!("Balance collection from {guest_name}"),
            });
        }

        record_audit(
            audit,
            &AuditEvent {
                actor: actor.to_string(),
                action: "collect",
                reference,
                detail: format!("{collected} via {}", input.mode),
            },
        );
        Ok(())
    }

    /// Marks the guest as checked in.
    pub fn check_in(
        books: &mut Books,
        id: BookingId,
        date: NaiveDate,
        actor: &str,
        audit: &dyn AuditSink,
    ) -> Result<(), SettlementError> {
        let booking = books
            .booking_mut(id)
            .ok_or_else(|| SettlementError::BookingNotFound(id.to_string()))?;
        if booking.status.is_terminal() {
            return Err(SettlementError::Terminal {
                reference: booking.reference.clone(),
                status: booking.status.to_string(),
            });
        }
        if booking.checked_in {
            return Err(SettlementError::AlreadyCheckedIn(booking.reference.clone()));
        }
        booking.checked_in = true;
        booking.checked_in_at = Some(Utc::now().naive_utc());
        booking.push_remark(date, actor, "checked in");
        let reference = booking.reference.clone();

        record_audit(
            audit,
            &AuditEvent {
                actor: actor.to_string(),
                action: "check_in",
                reference,
                detail: String::new(),
            },
        );
        Ok(())
    }

    /// Checks the guest out, settling KOT, add-ons, and the remaining
    /// balance through one of three branches: office pass-through,
    /// agent-ledger transfer, or direct full settlement.
    #[allow(clippy::too_many_lines)]
    pub fn checkout(
        books: &mut Books,
        id: BookingId,
        input: CheckoutInput,
        actor: &str,
        kitchen: &mut dyn KitchenOrders,
        audit: &dyn AuditSink,
    ) -> Result<CheckoutOutcome, SettlementError> {
        let booking = books
            .booking(id)
            .ok_or_else(|| SettlementError::BookingNotFound(id.to_string()))?;
        let reference = booking.reference.clone();
        if booking.status.is_terminal() {
            return Err(SettlementError::Terminal {
                reference,
                status: booking.status.to_string(),
            });
        }
        if booking.checked_out {
            return Err(SettlementError::AlreadyCheckedOut(reference));
        }

        let kot = round_currency(input.kot_amount);
        if kot < Decimal::ZERO {
            return Err(SettlementError::NonPositiveAmount(kot));
        }
        // Zero-amount add-ons are silently skipped, like everywhere else.
        let add_ons: Vec<AddOn> = input
            .add_ons
            .iter()
            .map(|a| AddOn {
                name: a.name.clone(),
                amount: round_currency(a.amount),
            })
            .filter(|a| a.amount > Decimal::ZERO)
            .collect();
        let addon_total: Decimal = add_ons.iter().map(|a| a.amount).sum();

        let room_rent = booking.room_rent;
        let add_on_before = booking.add_on_amount;
        let received = booking.received();
        let balance = non_negative(booking.total_amount + kot + addon_total - received);

        let is_office = input.mode.is_pass_through();
        let transfer = input.ledger_transfer.as_ref().filter(|_| !is_office);
        let (received_delta, collected_direct, transfer_remainder) = if is_office {
            // The office settles everything; nothing lands in direct
            // receipts, so no room-rent entry may follow.
            (balance, Decimal::ZERO, Decimal::ZERO)
        } else if let Some(t) = transfer {
            let collect = round_currency(t.collect_amount).clamp(Decimal::ZERO, balance);
            (collect, collect, balance - collect)
        } else {
            (balance, balance, Decimal::ZERO)
        };
        let share = if is_office {
            non_negative(room_rent + add_on_before + addon_total - received)
        } else {
            Decimal::ZERO
        };

        let status = {
            let booking = books
                .booking_mut(id)
                .ok_or_else(|| SettlementError::BookingNotFound(id.to_string()))?;
            booking.kot_amount += kot;
            booking.add_on_amount += addon_total;
            booking.total_amount += kot + addon_total;
            booking.balance_received += received_delta;
            if received_delta > Decimal::ZERO {
                booking.balance_date = Some(input.date);
                booking.balance_mode = Some(input.mode);
            }
            if transfer.is_some() {
                booking.payment_type = PaymentType::Ledger;
            }
            booking.checked_out = true;
            booking.checked_out_at = Some(Utc::now().naive_utc());
            booking.status = booking.derived_status();
            booking.push_remark(input.date, actor, "checked out");
            if transfer_remainder > Decimal::ZERO {
                booking.push_remark(
                    input.date,
                    actor,
                    &format!("{transfer_remainder} moved to agent ledger"),
                );
            }
            booking.status
        };

        // The kitchen collaborator settles unpaid orders and emits its
        // own entries for them; only the manual excess is billed here.
        let kitchen_settled = kitchen.settle_unpaid_by_booking(books, &reference, input.mode, actor);
        let kot_extra = non_negative(kot - kitchen_settled);

        if kot_extra > Decimal::ZERO && !books.daybook().contains(input.date, &reference, SUB_KOT) {
            books.daybook_mut().append(EntryInput {
                date: input.date,
                kind: EntryKind::Income,
                category: CATEGORY_KOT.to_string(),
                sub_category: Some(SUB_KOT.to_string()),
                amount: kot_extra,
                channel: input.mode,
                reference: Some(reference.clone()),
                description: format!("Kitchen orders for {reference}"),
            });
        }

        // Add-ons are real hotel income even under pass-through.
        if addon_total > Decimal::ZERO
            && !books.daybook().contains(input.date, &reference, SUB_ADD_ONS)
        {
            let names: Vec<&str> = add_ons.iter().map(|a| a.name.as_str()).collect();
            books.daybook_mut().append(EntryInput {
                date: input.date,
                kind: EntryKind::Income,
                category: CATEGORY_ADD_ONS.to_string(),
                sub_category: Some(SUB_ADD_ONS.to_string()),
                amount: addon_total,
                channel: input.mode,
                reference: Some(reference.clone()),
                description: names.join(", "),
            });
        }

        if is_office && share > Decimal::ZERO {
            books.push_pass_through(PassThroughPayment {
                id: PassThroughId::new(),
                booking_id: id,
                reference: reference.clone(),
                amount: share,
                sub_category: SUB_CHECKOUT.to_string(),
                date: input.date,
                context: PassThroughContext::Checkout,
            });
        }

        // Only the part of the collected balance that is actually room
        // rent lands under "Room Rent"; KOT and add-on sub-amounts were
        // billed above under their own categories.
        let room_portion = collected_direct - kot_extra - addon_total;
        if !is_office
            && room_portion > Decimal::ZERO
            && !books.daybook().contains(input.date, &reference, SUB_CHECKOUT)
        {
            books.daybook_mut().append(EntryInput {
                date: input.date,
                kind: EntryKind::Income,
                category: CATEGORY_ROOM_RENT.to_string(),
                sub_category: Some(SUB_CHECKOUT.to_string()),
                amount: room_portion,
                channel: input.mode,
                reference: Some(reference.clone()),
                description: format!("Checkout settlement for {reference}"),
            });
        }

        info!(%reference, %status, collected = %collected_direct, "checkout settled");
        record_audit(
            audit,
            &AuditEvent {
                actor: actor.to_string(),
                action: "checkout",
                reference,
                detail: format!("collected {collected_direct} via {}", input.mode),
            },
        );

        Ok(CheckoutOutcome {
            status,
            total_amount: books
                .booking(id)
                .map_or(Decimal::ZERO, |b| b.total_amount),
            collected: collected_direct,
            kitchen_settled,
            pass_through_share: (share > Decimal::ZERO).then_some(share),
        })
    }

    /// Cancels the booking. Already-emitted entries are left standing
    /// unless a refund is processed afterwards.
    pub fn cancel(
        books: &mut Books,
        id: BookingId,
        date: NaiveDate,
        note: &str,
        actor: &str,
        audit: &dyn AuditSink,
    ) -> Result<(), SettlementError> {
        Self::terminate(books, id, BookingStatus::Cancelled, date, note, actor, audit, "cancel")
    }

    /// Soft-deletes the booking; the record remains for the audit trail.
    pub fn delete(
        books: &mut Books,
        id: BookingId,
        date: NaiveDate,
        note: &str,
        actor: &str,
        audit: &dyn AuditSink,
    ) -> Result<(), SettlementError> {
        Self::terminate(books, id, BookingStatus::Deleted, date, note, actor, audit, "delete")
    }

    /// Marks the booking as superseded by a rescheduled stay.
    pub fn reschedule(
        books: &mut Books,
        id: BookingId,
        date: NaiveDate,
        note: &str,
        actor: &str,
        audit: &dyn AuditSink,
    ) -> Result<(), SettlementError> {
        Self::terminate(
            books,
            id,
            BookingStatus::Rescheduled,
            date,
            note,
            actor,
            audit,
            "reschedule",
        )
    }

    /// Refunds a cancelled booking, optionally deleting every income
    /// entry it emitted, then emitting one expense entry.
    pub fn refund(
        books: &mut Books,
        id: BookingId,
        input: RefundInput,
        actor: &str,
        audit: &dyn AuditSink,
    ) -> Result<(), SettlementError> {
        let booking = books
            .booking(id)
            .ok_or_else(|| SettlementError::BookingNotFound(id.to_string()))?;
        let reference = booking.reference.clone();
        if booking.status != BookingStatus::Cancelled {
            return Err(SettlementError::RefundRequiresCancelled(reference));
        }
        let amount = round_currency(input.amount);
        if amount <= Decimal::ZERO {
            return Err(SettlementError::NonPositiveAmount(amount));
        }

        if input.delete_original_entries {
            let removed = books.daybook_mut().delete_income_by_reference(&reference);
            info!(%reference, removed, "deleted original income entries before refund");
        }

        if !books.daybook().contains(input.date, &reference, SUB_REFUND) {
            books.daybook_mut().append(EntryInput {
                date: input.date,
                kind: EntryKind::Expense,
                category: CATEGORY_REFUND.to_string(),
                sub_category: Some(SUB_REFUND.to_string()),
                amount,
                channel: input.mode,
                reference: Some(reference.clone()),
                description: format!("Refund for {reference}"),
            });
        }

        if let Some(booking) = books.booking_mut(id) {
            booking.push_remark(input.date, actor, &format!("refunded {amount}"));
        }

        record_audit(
            audit,
            &AuditEvent {
                actor: actor.to_string(),
                action: "refund",
                reference,
                detail: format!("{amount} via {}", input.mode),
            },
        );
        Ok(())
    }

    /// Shared terminal transition: pure status overwrite plus an audit
    /// note; no ledger mutation.
    #[allow(clippy::too_many_arguments)]
    fn terminate(
        books: &mut Books,
        id: BookingId,
        status: BookingStatus,
        date: NaiveDate,
        note: &str,
        actor: &str,
        audit: &dyn AuditSink,
        action: &'static str,
    ) -> Result<(), SettlementError> {
        let booking = books
            .booking_mut(id)
            .ok_or_else(|| SettlementError::BookingNotFound(id.to_string()))?;
        if booking.status.is_terminal() {
            return Err(SettlementError::Terminal {
                reference: booking.reference.clone(),
                status: booking.status.to_string(),
            });
        }
        booking.status = status;
        let remark = if note.is_empty() {
            action.to_string()
        } else {
            format!("{action}: {note}")
        };
        booking.push_remark(date, actor, &remark);
        let reference = booking.reference.clone();

        record_audit(
            audit,
            &AuditEvent {
                actor: actor.to_string(),
                action,
                reference,
                detail: note.to_string(),
            },
        );
        Ok(())
    }
}
