//! Posting error types.
//!
//! Validation errors are never retried, a missing rule is a configuration
//! problem, and only database failures are worth retrying.

use rust_decimal::Decimal;
use thiserror::Error;
use partida_shared::types::{
    CategoryId, FinancialEntryId, JournalEntryId, LedgerAccountId, TenantId,
};

use super::types::OriginKind;

/// Errors that can occur while resolving and posting a journal entry.
#[derive(Debug, Error)]
pub enum PostingError {
    // ========== Validation Errors ==========
    /// Tenant id is not a positive integer.
    #[error("Invalid tenant id: {0}")]
    InvalidTenant(TenantId),

    /// Posting amount is zero.
    #[error("Posting amount cannot be zero")]
    ZeroAmount,

    /// Posting amount is negative.
    #[error("Posting amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// Posting amount has more decimal places than the ledger stores.
    #[error("Posting amount has more than {max} decimal places: {amount}")]
    InvalidAmountPrecision {
        /// Amount as supplied.
        amount: Decimal,
        /// Largest supported scale.
        max: u32,
    },

    /// Posting amount does not fit the ledger columns.
    #[error("Posting amount is out of range: {0}")]
    AmountOutOfRange(Decimal),

    /// A rule debits and credits the same account.
    #[error("Rule debits and credits the same account: {0}")]
    SameDebitCreditAccount(LedgerAccountId),

    /// A rule has neither a category nor a subtype to match on.
    #[error("Rule must have a category or a subtype")]
    MissingRuleKey,

    /// Stored or requested kind is not a known origin.
    #[error("Unknown financial entry kind: {0}")]
    UnknownKind(String),

    /// A journal needs at least a debit and a credit line.
    #[error("Journal must have at least 2 lines")]
    InsufficientLines,

    /// A line must move exactly one side.
    #[error("Journal line must have exactly one of debit or credit")]
    InvalidLine,

    /// Debits do not equal credits.
    #[error("Journal is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedJournal {
        /// Sum of debit column.
        debit: Decimal,
        /// Sum of credit column.
        credit: Decimal,
    },

    /// Event name is not handled.
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// Event payload could not be read.
    #[error("Invalid event payload: {0}")]
    InvalidEvent(String),

    // ========== Configuration Errors ==========
    /// No active automatic rule matched.
    #[error(
        "No active automatic rule for {origin} ({})",
        rule_key(.category_id, .subtype)
    )]
    NoActiveRule {
        /// Entry kind.
        origin: OriginKind,
        /// Category looked up.
        category_id: Option<CategoryId>,
        /// Subtype looked up.
        subtype: Option<String>,
    },

    // ========== Not Found Errors ==========
    /// Source financial entry does not exist for the tenant.
    #[error("Financial entry not found: {0}")]
    FinancialEntryNotFound(FinancialEntryId),

    /// Journal entry does not exist for the tenant.
    #[error("Journal entry not found: {0}")]
    JournalEntryNotFound(JournalEntryId),

    // ========== Infrastructure Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[allow(clippy::ref_option)]
fn rule_key(category_id: &Option<CategoryId>, subtype: &Option<String>) -> String {
    let category = category_id.map_or_else(|| "-".to_string(), |c| c.to_string());
    let subtype = subtype.as_deref().unwrap_or("-");
    format!("category: {category}, subtype: {subtype}")
}

impl PostingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTenant(_) => "INVALID_TENANT",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::InvalidAmountPrecision { .. } => "INVALID_AMOUNT_PRECISION",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::SameDebitCreditAccount(_) => "SAME_DEBIT_CREDIT_ACCOUNT",
            Self::MissingRuleKey => "MISSING_RULE_KEY",
            Self::UnknownKind(_) => "UNKNOWN_KIND",
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::InvalidLine => "INVALID_LINE",
            Self::UnbalancedJournal { .. } => "UNBALANCED_JOURNAL",
            Self::UnknownEvent(_) => "UNKNOWN_EVENT",
            Self::InvalidEvent(_) => "INVALID_EVENT",
            Self::NoActiveRule { .. } => "NO_ACTIVE_RULE",
            Self::FinancialEntryNotFound(_) => "FINANCIAL_ENTRY_NOT_FOUND",
            Self::JournalEntryNotFound(_) => "JOURNAL_ENTRY_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidTenant(_)
            | Self::ZeroAmount
            | Self::NegativeAmount(_)
            | Self::InvalidAmountPrecision { .. }
            | Self::AmountOutOfRange(_)
            | Self::SameDebitCreditAccount(_)
            | Self::MissingRuleKey
            | Self::UnknownKind(_)
            | Self::InsufficientLines
            | Self::InvalidLine
            | Self::UnbalancedJournal { .. }
            | Self::UnknownEvent(_)
            | Self::InvalidEvent(_) => 400,

            // 404 Not Found
            Self::FinancialEntryNotFound(_) | Self::JournalEntryNotFound(_) => 404,

            // 422 Unprocessable - configuration missing
            Self::NoActiveRule { .. } => 422,

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns true if the whole posting attempt may be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// Returns true for errors caused by the input rather than the system.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.http_status_code() == 400
    }
}
