//! Posting orchestrator.
//!
//! Loads the source fact, consults the idempotency guard, resolves the rule,
//! drafts the journal and hands it to the poster. Two entry points:
//!
//! - [`PostingRepository::create_and_post`] records a new financial entry and
//!   posts it in the same transaction; a missing rule leaves no trace.
//! - [`PostingRepository::post_financial_entry`] posts an entry that already
//!   exists, and backs [`PostingRepository::handle_event`] for at-least-once
//!   event delivery.

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use partida_core::posting::{
    DeliveryOutcome, EventEnvelope, FinancialEntry, PostingError, PostingEvent, PostingService,
    classify,
};
use partida_shared::types::{FinancialEntryId, TenantId};

use super::accounting_rule::resolve_on;
use super::financial_entry::{self, NewFinancialEntry};
use super::journal::{JournalRepository, PostedJournal, insert_draft, rollback};
use crate::error::AccountingError;

/// A newly recorded financial entry and its journal entry.
#[derive(Debug, Clone)]
pub struct CreatedPosting {
    /// The recorded entry.
    pub financial_entry: FinancialEntry,
    /// The journal entry posted for it.
    pub journal: PostedJournal,
}

/// Orchestrates resolution and posting.
#[derive(Debug, Clone)]
pub struct PostingRepository {
    db: DatabaseConnection,
    journal: JournalRepository,
}

impl PostingRepository {
    /// Creates a new posting orchestrator.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            journal: JournalRepository::new(db.clone()),
            db,
        }
    }

    /// Records a financial entry and posts it atomically.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveRule` if no rule matches, a validation error for bad
    /// input, or a database error. Nothing is written on error.
    pub async fn create_and_post(
        &self,
        tenant_id: TenantId,
        input: &NewFinancialEntry,
    ) -> Result<CreatedPosting, AccountingError> {
        let txn = self.db.begin().await?;

        match create_and_post_on(&txn, tenant_id, input).await {
            Ok(created) => {
                txn.commit().await?;
                tracing::info!(
                    tenant_id = %tenant_id,
                    financial_entry_id = %created.financial_entry.id,
                    journal_entry_id = %created.journal.id(),
                    outcome = "posted",
                    "Financial entry created and posted"
                );
                Ok(created)
            }
            Err(err) => {
                rollback(txn).await;
                log_failure(tenant_id, None, &err);
                Err(err)
            }
        }
    }

    /// Posts an existing financial entry.
    ///
    /// Returns the existing journal entry, flagged `already_exists`, when the
    /// entry was posted before.
    ///
    /// # Errors
    ///
    /// Returns `FinancialEntryNotFound`, `NoActiveRule`, a validation error or
    /// a database error.
    pub async fn post_financial_entry(
        &self,
        tenant_id: TenantId,
        financial_entry_id: FinancialEntryId,
    ) -> Result<PostedJournal, AccountingError> {
        let result = self.post_existing(tenant_id, financial_entry_id).await;

        match &result {
            Ok(posted) if posted.already_exists => tracing::info!(
                tenant_id = %tenant_id,
                financial_entry_id = %financial_entry_id,
                journal_entry_id = %posted.id(),
                outcome = "already_posted",
                "Financial entry already posted"
            ),
            Ok(posted) => tracing::info!(
                tenant_id = %tenant_id,
                financial_entry_id = %financial_entry_id,
                journal_entry_id = %posted.id(),
                outcome = "posted",
                "Financial entry posted"
            ),
            Err(err) => log_failure(tenant_id, Some(financial_entry_id), err),
        }

        result
    }

    async fn post_existing(
        &self,
        tenant_id: TenantId,
        financial_entry_id: FinancialEntryId,
    ) -> Result<PostedJournal, AccountingError> {
        let entry = financial_entry::find_on(&self.db, tenant_id, financial_entry_id)
            .await?
            .ok_or(PostingError::FinancialEntryNotFound(financial_entry_id))?;

        if let Some(existing) = self
            .journal
            .find_existing_posting(tenant_id, financial_entry_id)
            .await?
        {
            return Ok(existing);
        }

        let (_, rule) = resolve_on(&self.db, &entry.rule_query()).await?;
        let draft = PostingService::draft_journal(&entry, &rule)?;

        self.journal.write(&draft).await
    }

    /// Handles one delivery of an event.
    ///
    /// The fact is always reloaded from storage; payload amounts are ignored.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEvent` or `InvalidEvent` for undecodable events, and
    /// database errors so the sender retries. Every other result is an
    /// outcome.
    pub async fn handle_event(
        &self,
        envelope: EventEnvelope,
    ) -> Result<DeliveryOutcome, AccountingError> {
        let delivery_id = envelope.id.clone();

        let event = PostingEvent::try_from(envelope).inspect_err(|err| {
            tracing::warn!(delivery_id = ?delivery_id, error = %err, "Rejected event");
        })?;

        let outcome = match event {
            PostingEvent::FinancialEntryCreated(payload) => {
                let result = self
                    .post_financial_entry(payload.tenant_id, payload.financial_entry_id)
                    .await
                    .map(|posted| posted.receipt())
                    .map_err(AccountingError::into_posting);
                classify(result)?
            }
        };

        tracing::info!(
            delivery_id = ?delivery_id,
            outcome = outcome.label(),
            "Event handled"
        );

        Ok(outcome)
    }
}

async fn create_and_post_on(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    input: &NewFinancialEntry,
) -> Result<CreatedPosting, AccountingError> {
    let entry = financial_entry::insert_on(txn, tenant_id, input).await?;
    let (_, rule) = resolve_on(txn, &entry.rule_query()).await?;
    let draft = PostingService::draft_journal(&entry, &rule)?;
    let journal = insert_draft(txn, &draft).await?;

    Ok(CreatedPosting {
        financial_entry: entry,
        journal,
    })
}

fn log_failure(tenant_id: TenantId, financial_entry_id: Option<FinancialEntryId>, err: &AccountingError) {
    match err {
        AccountingError::Posting(PostingError::FinancialEntryNotFound(_)) => tracing::warn!(
            tenant_id = %tenant_id,
            financial_entry_id = ?financial_entry_id,
            outcome = "not_found",
            "Financial entry not found"
        ),
        AccountingError::Posting(PostingError::NoActiveRule { .. }) => tracing::warn!(
            tenant_id = %tenant_id,
            financial_entry_id = ?financial_entry_id,
            outcome = "no_rule",
            error = %err,
            "No accounting rule matched"
        ),
        AccountingError::Posting(_) => tracing::warn!(
            tenant_id = %tenant_id,
            financial_entry_id = ?financial_entry_id,
            outcome = "invalid",
            error = %err,
            "Posting rejected"
        ),
        AccountingError::Database(_) => tracing::error!(
            tenant_id = %tenant_id,
            financial_entry_id = ?financial_entry_id,
            error = %err,
            "Posting failed"
        ),
    }
}
