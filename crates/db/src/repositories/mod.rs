//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod accounting_rule;
pub mod financial_entry;
pub mod journal;
pub mod ledger_account;
pub mod posting;

pub use accounting_rule::{AccountingRuleRepository, CreateAccountingRuleInput, RuleLookup};
pub use financial_entry::{FinancialEntryRepository, NewFinancialEntry};
pub use journal::{JournalRepository, PostedJournal};
pub use ledger_account::{CreateLedgerAccountInput, LedgerAccountRepository};
pub use posting::{CreatedPosting, PostingRepository};
