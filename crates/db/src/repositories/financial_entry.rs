//! Ledger store repository for financial entries.
//!
//! Rows are validated at this boundary: the stored kind must parse into an
//! [`OriginKind`] and amounts are read back as absolute values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use partida_core::posting::{FinancialEntry, OriginKind, PostingError, PostingService};
use partida_shared::types::{
    CategoryId, EntityId, FinancialAccountId, FinancialEntryId, TenantId,
};

use crate::entities::lancamentos_financeiros;
use crate::error::AccountingError;

/// Status of a freshly recorded entry.
pub const STATUS_PENDING: &str = "pendente";

/// Input for recording a financial entry.
#[derive(Debug, Clone)]
pub struct NewFinancialEntry {
    /// Entry kind.
    pub kind: OriginKind,
    /// Customer or supplier.
    pub entity_id: Option<EntityId>,
    /// Financial category.
    pub category_id: Option<CategoryId>,
    /// Subtype (e.g. `principal`).
    pub subtype: Option<String>,
    /// Amount as supplied; the absolute value is stored.
    pub amount: Decimal,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Description.
    pub description: String,
    /// Bank or cash account.
    pub financial_account_id: Option<FinancialAccountId>,
}

/// Repository for `lancamentos_financeiros`.
#[derive(Debug, Clone)]
pub struct FinancialEntryRepository {
    db: DatabaseConnection,
}

impl FinancialEntryRepository {
    /// Creates a new financial entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an entry without posting it.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero amount or invalid tenant, or a
    /// database error.
    pub async fn create(
        &self,
        tenant_id: TenantId,
        input: &NewFinancialEntry,
    ) -> Result<FinancialEntry, AccountingError> {
        insert_on(&self.db, tenant_id, input).await
    }

    /// Loads an entry of `tenant_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is corrupt.
    pub async fn find_by_id(
        &self,
        tenant_id: TenantId,
        id: FinancialEntryId,
    ) -> Result<Option<FinancialEntry>, AccountingError> {
        find_on(&self.db, tenant_id, id).await
    }
}

/// Inserts an entry on any connection, including an open transaction.
pub(crate) async fn insert_on<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    input: &NewFinancialEntry,
) -> Result<FinancialEntry, AccountingError> {
    PostingService::validate_tenant(tenant_id)?;
    let amount = PostingService::normalize_amount(input.amount)?;

    let model = lancamentos_financeiros::ActiveModel {
        tenant_id: Set(tenant_id.get()),
        tipo: Set(input.kind.as_str().to_string()),
        descricao: Set(input.description.clone()),
        valor: Set(amount),
        data_lancamento: Set(input.posting_date),
        data_vencimento: Set(input.due_date),
        status: Set(STATUS_PENDING.to_string()),
        entidade_id: Set(input.entity_id.map(EntityId::get)),
        categoria_id: Set(input.category_id.map(CategoryId::get)),
        subtipo: Set(input.subtype.clone()),
        conta_financeira_id: Set(input.financial_account_id.map(FinancialAccountId::get)),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(to_domain(model)?)
}

/// Loads an entry on any connection.
pub(crate) async fn find_on<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    id: FinancialEntryId,
) -> Result<Option<FinancialEntry>, AccountingError> {
    let model = lancamentos_financeiros::Entity::find_by_id(id.get())
        .filter(lancamentos_financeiros::Column::TenantId.eq(tenant_id.get()))
        .one(conn)
        .await?;

    Ok(model.map(to_domain).transpose()?)
}

/// Maps a stored row to the domain type.
///
/// # Errors
///
/// Returns `UnknownKind` if the stored kind is not a known origin.
pub fn to_domain(model: lancamentos_financeiros::Model) -> Result<FinancialEntry, PostingError> {
    let kind = model.tipo.parse::<OriginKind>()?;

    Ok(FinancialEntry {
        id: FinancialEntryId::new(model.id),
        tenant_id: TenantId::new(model.tenant_id),
        kind,
        entity_id: model.entidade_id.map(EntityId::new),
        category_id: model.categoria_id.map(CategoryId::new),
        subtype: model.subtipo,
        amount: model.valor.abs(),
        posting_date: model.data_lancamento,
        due_date: model.data_vencimento,
        description: model.descricao,
        financial_account_id: model.conta_financeira_id.map(FinancialAccountId::new),
        status: model.status,
    })
}
