//! Chart of accounts repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use partida_shared::types::{LedgerAccountId, TenantId};

use crate::entities::plano_contas;

/// Input for creating a ledger account.
#[derive(Debug, Clone)]
pub struct CreateLedgerAccountInput {
    /// Explicit id, for imports that must keep the source numbering.
    pub id: Option<LedgerAccountId>,
    /// Account code (e.g. `2.1.01`).
    pub codigo: String,
    /// Account name.
    pub nome: String,
    /// Account type (`Ativo`, `Passivo`, `Despesa`, `Receita`, ...).
    pub tipo_conta: String,
}

/// Repository for `plano_contas`.
#[derive(Debug, Clone)]
pub struct LedgerAccountRepository {
    db: DatabaseConnection,
}

impl LedgerAccountRepository {
    /// Creates a new ledger account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an active account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including a duplicate code).
    pub async fn create(
        &self,
        tenant_id: TenantId,
        input: CreateLedgerAccountInput,
    ) -> Result<plano_contas::Model, DbErr> {
        let mut account = plano_contas::ActiveModel {
            tenant_id: Set(tenant_id.get()),
            codigo: Set(input.codigo),
            nome: Set(input.nome),
            tipo_conta: Set(input.tipo_conta),
            ativo: Set(true),
            ..Default::default()
        };
        if let Some(id) = input.id {
            account.id = Set(id.get());
        }

        account.insert(&self.db).await
    }

    /// Lists a tenant's accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, tenant_id: TenantId) -> Result<Vec<plano_contas::Model>, DbErr> {
        plano_contas::Entity::find()
            .filter(plano_contas::Column::TenantId.eq(tenant_id.get()))
            .order_by_asc(plano_contas::Column::Codigo)
            .all(&self.db)
            .await
    }

    /// Finds the tenant's accounts among `ids`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_ids(
        &self,
        tenant_id: TenantId,
        ids: &[LedgerAccountId],
    ) -> Result<Vec<plano_contas::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        plano_contas::Entity::find()
            .filter(plano_contas::Column::TenantId.eq(tenant_id.get()))
            .filter(plano_contas::Column::Id.is_in(ids.iter().map(|id| id.get())))
            .all(&self.db)
            .await
    }
}
