//! Posting service: turns a financial entry and a rule match into a draft.
//!
//! Pure business logic with no database dependencies. The database layer
//! loads the entry, resolves the rule, asks this service for the draft and
//! writes it in one transaction.

use rust_decimal::Decimal;
use partida_shared::types::TenantId;

use super::error::PostingError;
use super::journal::{EntrySide, JournalDraft, JournalLineDraft};
use super::types::{FinancialEntry, RuleMatch};
use super::validation::{validate_amount, validate_lines};

/// Posting service for journal drafting.
pub struct PostingService;

impl PostingService {
    /// Validates a tenant id.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTenant` for non-positive ids.
    pub fn validate_tenant(tenant_id: TenantId) -> Result<TenantId, PostingError> {
        if tenant_id.is_valid() {
            Ok(tenant_id)
        } else {
            Err(PostingError::InvalidTenant(tenant_id))
        }
    }

    /// Normalizes a user-supplied amount to the stored absolute value.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount` if the amount is zero.
    pub fn normalize_amount(raw: Decimal) -> Result<Decimal, PostingError> {
        validate_amount(raw.abs())
    }

    /// Builds the two-line journal draft for `entry` using `rule`.
    ///
    /// 1. Validates the tenant and the amount (positive, non-zero)
    /// 2. Debits the rule's debit account by the full amount
    /// 3. Credits the rule's credit account by the full amount
    /// 4. Verifies the balance invariant
    ///
    /// # Errors
    ///
    /// Returns `PostingError` if validation fails.
    pub fn draft_journal(entry: &FinancialEntry, rule: &RuleMatch) -> Result<JournalDraft, PostingError> {
        Self::validate_tenant(entry.tenant_id)?;
        let amount = validate_amount(entry.amount)?;

        let narrative = entry.description.as_str();
        let lines = vec![
            JournalLineDraft::new(EntrySide::Debit, rule.accounts.debit(), amount, narrative),
            JournalLineDraft::new(EntrySide::Credit, rule.accounts.credit(), amount, narrative),
        ];

        let totals = validate_lines(&lines)?;

        Ok(JournalDraft {
            tenant_id: entry.tenant_id,
            financial_entry_id: entry.id,
            posting_date: entry.posting_date,
            narrative: entry.description.clone(),
            counterparty: entry.counterparty(),
            financial_account_id: entry.financial_account_id,
            lines,
            totals,
        })
    }
}
