//! Journal repository: idempotency guard, poster and read-back.
//!
//! A journal entry is written as one header and its lines inside a single
//! database transaction. The unique index on
//! `(tenant_id, lancamento_financeiro_id)` backs the guard: a concurrent
//! duplicate insert is rolled back and the existing entry is returned.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use partida_core::posting::{JournalDraft, PostingError, PostingReceipt};
use partida_shared::types::{
    EntityId, FinancialAccountId, FinancialEntryId, JournalEntryId, PageRequest, PageResponse,
    TenantId,
};

use crate::entities::{lancamentos_contabeis, lancamentos_contabeis_linhas};
use crate::error::{AccountingError, is_unique_violation};

/// A persisted journal entry with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct PostedJournal {
    /// Header.
    pub entry: lancamentos_contabeis::Model,
    /// Lines in insertion order.
    pub lines: Vec<lancamentos_contabeis_linhas::Model>,
    /// True when the entry existed before this call.
    pub already_exists: bool,
}

impl PostedJournal {
    /// Id of the journal entry.
    #[must_use]
    pub const fn id(&self) -> JournalEntryId {
        JournalEntryId::new(self.entry.id)
    }

    /// Receipt for the posting attempt.
    #[must_use]
    pub const fn receipt(&self) -> PostingReceipt {
        PostingReceipt {
            journal_entry_id: self.id(),
            already_exists: self.already_exists,
        }
    }
}

/// Repository for `lancamentos_contabeis` and its lines.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Idempotency guard
    // ========================================================================

    /// Finds the journal entry already posted for a financial entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_existing_posting(
        &self,
        tenant_id: TenantId,
        financial_entry_id: FinancialEntryId,
    ) -> Result<Option<PostedJournal>, AccountingError> {
        Ok(find_posting_on(&self.db, tenant_id, financial_entry_id).await?)
    }

    /// Returns true if the financial entry has been posted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn has_existing_posting(
        &self,
        tenant_id: TenantId,
        financial_entry_id: FinancialEntryId,
    ) -> Result<bool, AccountingError> {
        let count = lancamentos_contabeis::Entity::find()
            .filter(lancamentos_contabeis::Column::TenantId.eq(tenant_id.get()))
            .filter(
                lancamentos_contabeis::Column::LancamentoFinanceiroId.eq(financial_entry_id.get()),
            )
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    // ========================================================================
    // Poster
    // ========================================================================

    /// Posts a draft unless its financial entry already has a journal entry.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails; nothing is committed in that case.
    pub async fn post(&self, draft: &JournalDraft) -> Result<PostedJournal, AccountingError> {
        if let Some(existing) = self
            .find_existing_posting(draft.tenant_id, draft.financial_entry_id)
            .await?
        {
            return Ok(existing);
        }
        self.write(draft).await
    }

    /// Writes a draft in its own transaction without consulting the guard.
    ///
    /// A duplicate for the same financial entry is still caught by the unique
    /// index and reported as the existing entry.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails; nothing is committed in that case.
    pub async fn write(&self, draft: &JournalDraft) -> Result<PostedJournal, AccountingError> {
        let txn = self.db.begin().await?;

        match insert_draft(&txn, draft).await {
            Ok(posted) => {
                txn.commit().await?;
                Ok(posted)
            }
            Err(err) if is_unique_violation(&err) => {
                rollback(txn).await;
                tracing::warn!(
                    tenant_id = %draft.tenant_id,
                    financial_entry_id = %draft.financial_entry_id,
                    "Concurrent posting detected, returning existing journal entry"
                );
                self.find_existing_posting(draft.tenant_id, draft.financial_entry_id)
                    .await?
                    .ok_or(AccountingError::Database(err))
            }
            Err(err) => {
                rollback(txn).await;
                Err(err.into())
            }
        }
    }

    // ========================================================================
    // Read-back
    // ========================================================================

    /// Gets a journal entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `JournalEntryNotFound` if the entry does not exist for the
    /// tenant, or a database error.
    pub async fn get(
        &self,
        tenant_id: TenantId,
        id: JournalEntryId,
    ) -> Result<PostedJournal, AccountingError> {
        let entry = lancamentos_contabeis::Entity::find_by_id(id.get())
            .filter(lancamentos_contabeis::Column::TenantId.eq(tenant_id.get()))
            .one(&self.db)
            .await?
            .ok_or(PostingError::JournalEntryNotFound(id))?;

        let lines = lines_on(&self.db, entry.id).await?;

        Ok(PostedJournal {
            entry,
            lines,
            already_exists: true,
        })
    }

    /// Lists journal headers, newest posting date first, ties by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        tenant_id: TenantId,
        page: PageRequest,
    ) -> Result<PageResponse<lancamentos_contabeis::Model>, AccountingError> {
        let page = page.normalized();

        let paginator = lancamentos_contabeis::Entity::find()
            .filter(lancamentos_contabeis::Column::TenantId.eq(tenant_id.get()))
            .order_by_desc(lancamentos_contabeis::Column::DataLancamento)
            .order_by_asc(lancamentos_contabeis::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(u64::from(page.page - 1)).await?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }
}

/// Loads the posting for a financial entry on any connection.
/// Rolls a failed transaction back, keeping the caller's error.
///
/// A rollback failure is only logged; the connection drops the transaction
/// either way.
pub(crate) async fn rollback(txn: DatabaseTransaction) {
    if let Err(err) = txn.rollback().await {
        tracing::error!(error = %err, "Transaction rollback failed");
    }
}

pub(crate) async fn find_posting_on<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    financial_entry_id: FinancialEntryId,
) -> Result<Option<PostedJournal>, sea_orm::DbErr> {
    let Some(entry) = lancamentos_contabeis::Entity::find()
        .filter(lancamentos_contabeis::Column::TenantId.eq(tenant_id.get()))
        .filter(lancamentos_contabeis::Column::LancamentoFinanceiroId.eq(financial_entry_id.get()))
        .one(conn)
        .await?
    else {
        return Ok(None);
    };

    let lines = lines_on(conn, entry.id).await?;

    Ok(Some(PostedJournal {
        entry,
        lines,
        already_exists: true,
    }))
}

async fn lines_on<C: ConnectionTrait>(
    conn: &C,
    journal_id: i64,
) -> Result<Vec<lancamentos_contabeis_linhas::Model>, sea_orm::DbErr> {
    lancamentos_contabeis_linhas::Entity::find()
        .filter(lancamentos_contabeis_linhas::Column::LancamentoId.eq(journal_id))
        .order_by_asc(lancamentos_contabeis_linhas::Column::Id)
        .all(conn)
        .await
}

/// Inserts the header, then every line, on the given connection.
///
/// The caller owns the transaction; an error leaves it to be rolled back.
pub(crate) async fn insert_draft<C: ConnectionTrait>(
    conn: &C,
    draft: &JournalDraft,
) -> Result<PostedJournal, sea_orm::DbErr> {
    let counterparty = draft.counterparty;

    let entry = lancamentos_contabeis::ActiveModel {
        tenant_id: Set(draft.tenant_id.get()),
        data_lancamento: Set(draft.posting_date),
        historico: Set(draft.narrative.clone()),
        cliente_id: Set(counterparty.and_then(|c| c.customer_id()).map(EntityId::get)),
        fornecedor_id: Set(counterparty.and_then(|c| c.supplier_id()).map(EntityId::get)),
        conta_financeira_id: Set(draft.financial_account_id.map(FinancialAccountId::get)),
        total_debitos: Set(draft.totals.debit),
        total_creditos: Set(draft.totals.credit),
        lancamento_financeiro_id: Set(Some(draft.financial_entry_id.get())),
        criado_em: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    let mut lines = Vec::with_capacity(draft.lines.len());
    for line in &draft.lines {
        let inserted = lancamentos_contabeis_linhas::ActiveModel {
            lancamento_id: Set(entry.id),
            conta_id: Set(line.account_id.get()),
            debito: Set(line.debit),
            credito: Set(line.credit),
            historico: Set(Some(line.narrative.clone())),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        lines.push(inserted);
    }

    Ok(PostedJournal {
        entry,
        lines,
        already_exists: false,
    })
}
