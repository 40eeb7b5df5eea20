//! Month-end close computation and propagation.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::info;

use folio_shared::types::{Month, non_negative, round_currency};

use crate::Books;
use crate::balance::BalanceService;
use crate::booking::PaymentType;
use crate::daybook::types::OFFICE_PREFIX;

use super::error::MonthCloseError;
use super::types::{AgentClosing, MonthClose};

/// Month-end close engine.
pub struct MonthCloseService;

impl MonthCloseService {
    /// One agent's opening ledger balance for a month; zero when never
    /// set.
    #[must_use]
    pub fn get_opening_balance(books: &Books, agent_name: &str, month: Month) -> Decimal {
        books.agent_opening(agent_name, month)
    }

    /// Sets one agent's opening ledger balance for a month.
    pub fn set_opening_balance(books: &mut Books, agent_name: &str, month: Month, amount: Decimal) {
        books.set_agent_opening(agent_name, month, round_currency(amount));
    }

    /// Computes the month's cash/bank closing and every agent's ledger
    /// closing balance.
    ///
    /// The agent set is every distinct name on non-cancelled
    /// agent-sourced bookings checking out in the month, every agent
    /// with an explicit opening or a settlement in the month, plus the
    /// pass-through office entity.
    #[must_use]
    pub fn calculate_closing_balances(books: &Books, month: Month) -> MonthClose {
        let position = BalanceService::day_position(books, month.last_day());

        let mut names: BTreeSet<String> = BTreeSet::new();
        names.insert(OFFICE_PREFIX.to_string());
        for booking in books.bookings() {
            if booking.status.is_terminal() {
                continue;
            }
            if let Some(agent) = &booking.agent_name {
                if month.contains(booking.check_out) {
                    names.insert(agent.clone());
                }
            }
        }
        for name in books.agents_with_openings(month) {
            names.insert(name);
        }
        for settlement in books.settlements() {
            if month.contains(settlement.date) {
                names.insert(settlement.agent_name.clone());
            }
        }

        let agents = names
            .into_iter()
            .map(|agent_name| {
                let opening = books.agent_opening(&agent_name, month);
                let earned = if agent_name == OFFICE_PREFIX {
                    books.pass_through_in(month).map(|p| p.amount).sum()
                } else {
                    Self::earned_by_agent(books, &agent_name, month)
                };
                let settled = books.settled_in_month(&agent_name, month);
                AgentClosing {
                    closing: opening + earned - settled,
                    agent_name,
                    opening,
                    earned,
                    settled,
                }
            })
            .collect();

        MonthClose {
            month,
            cash_closing: position.cash_closing,
            bank_closing: position.bank_closing,
            agents,
        }
    }

    /// Closes the month and writes every closing balance forward as the
    /// next month's opening: the cash/bank result becomes the day-1
    /// checkpoint, each agent closing becomes that agent's opening.
    ///
    /// Re-running for the same month re-derives and overwrites; nothing
    /// accumulates.
    pub fn carry_forward_to_next_month(
        books: &mut Books,
        month: Month,
    ) -> Result<MonthClose, MonthCloseError> {
        let close = Self::calculate_closing_balances(books, month);
        let next = month.next()?;

        BalanceService::set_balance(books, next.first_day(), close.cash_closing, close.bank_closing);
        for agent in &close.agents {
            books.set_agent_opening(&agent.agent_name, next, agent.closing);
        }

        info!(
            %month,
            cash = %close.cash_closing,
            bank = %close.bank_closing,
            agents = close.agents.len(),
            "carried month forward"
        );
        Ok(close)
    }

    /// What an ordinary agent earned in a month: the positive
    /// outstanding balance of each non-cancelled Ledger-type booking of
    /// theirs whose checkout date falls in the month.
    fn earned_by_agent(books: &Books, agent_name: &str, month: Month) -> Decimal {
        books
            .bookings()
            .filter(|b| {
                !b.status.is_terminal()
                    && b.payment_type == PaymentType::Ledger
                    && b.agent_name.as_deref() == Some(agent_name)
                    && month.contains(b.check_out)
            })
            .map(|b| non_negative(b.pending()))
            .sum()
    }
}
