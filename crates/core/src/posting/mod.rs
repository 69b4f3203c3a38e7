//! Automatic double-entry posting.
//!
//! This module implements the database-free half of the posting pipeline:
//! - Origin kinds and counterparty sides
//! - Accounting rule selection (category first, then subtype, lowest id)
//! - Journal drafting with the balance invariant
//! - Posting events and delivery outcomes
//! - Error types for posting operations

pub mod error;
pub mod event;
pub mod journal;
pub mod rule;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod rule_props;
#[cfg(test)]
mod service_props;

pub use error::PostingError;
pub use event::{
    DeliveryOutcome, EventEnvelope, FailureReason, FinancialEntryCreated, PostingEvent,
    SkipReason, classify, FINANCIAL_ENTRY_CREATED,
};
pub use journal::{EntrySide, JournalDraft, JournalLineDraft, JournalTotals};
pub use rule::{no_active_rule, select_rule, to_match, validate_rule_definition};
pub use service::PostingService;
pub use types::{
    AccountingRule, Counterparty, CounterpartySide, FinancialEntry, MatchedBy, OriginKind,
    PostingReceipt, RuleAccounts, RuleMatch, RuleQuery,
};
pub use validation::{validate_amount, validate_lines};
