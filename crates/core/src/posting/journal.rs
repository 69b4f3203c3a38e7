//! Journal drafts.
//!
//! A draft is the fully computed header and lines of a journal entry before
//! it is written. The poster persists a draft verbatim.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use partida_shared::types::{
    FinancialAccountId, FinancialEntryId, LedgerAccountId, TenantId,
};

use super::types::Counterparty;

/// Side of a journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// Debit column.
    Debit,
    /// Credit column.
    Credit,
}

/// One account movement of a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalLineDraft {
    /// Account moved.
    pub account_id: LedgerAccountId,
    /// Debit amount (zero on credit lines).
    pub debit: Decimal,
    /// Credit amount (zero on debit lines).
    pub credit: Decimal,
    /// Line narrative.
    pub narrative: String,
}

impl JournalLineDraft {
    /// Creates a line moving `amount` on `side` of `account_id`.
    #[must_use]
    pub fn new(side: EntrySide, account_id: LedgerAccountId, amount: Decimal, narrative: &str) -> Self {
        let (debit, credit) = match side {
            EntrySide::Debit => (amount, Decimal::ZERO),
            EntrySide::Credit => (Decimal::ZERO, amount),
        };
        Self {
            account_id,
            debit,
            credit,
            narrative: narrative.to_string(),
        }
    }

    /// The side this line moves, if exactly one side is non-zero.
    #[must_use]
    pub fn side(&self) -> Option<EntrySide> {
        match (self.debit.is_zero(), self.credit.is_zero()) {
            (false, true) => Some(EntrySide::Debit),
            (true, false) => Some(EntrySide::Credit),
            _ => None,
        }
    }
}

/// Sum of each column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JournalTotals {
    /// Sum of debits.
    pub debit: Decimal,
    /// Sum of credits.
    pub credit: Decimal,
}

impl JournalTotals {
    /// Returns true when debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }
}

/// A journal entry ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalDraft {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Source financial entry, stored as the idempotency back-reference.
    pub financial_entry_id: FinancialEntryId,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Header narrative (`historico`).
    pub narrative: String,
    /// Supplier or customer.
    pub counterparty: Option<Counterparty>,
    /// Bank or cash account.
    pub financial_account_id: Option<FinancialAccountId>,
    /// Debit line, then credit line.
    pub lines: Vec<JournalLineDraft>,
    /// Column totals, already verified to balance.
    pub totals: JournalTotals,
}
