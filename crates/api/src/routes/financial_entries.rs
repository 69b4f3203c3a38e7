//! Posting routes.
//!
//! - `POST /tenants/{tenant_id}/financial-entries` records a financial entry
//!   and posts it in one transaction.
//! - `POST /tenants/{tenant_id}/financial-entries/{id}/post` posts an entry
//!   that already exists; repeating it returns the same journal entry.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use partida_core::posting::{OriginKind, PostingService};
use partida_db::repositories::{NewFinancialEntry, PostingRepository};
use partida_shared::AppError;
use partida_shared::types::{
    CategoryId, EntityId, FinancialAccountId, FinancialEntryId, TenantId,
};

use super::journal_entries::{format_amount, journal_to_response};
use crate::{AppState, error::ApiError};

/// Creates the posting routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/financial-entries",
            post(create_financial_entry),
        )
        .route(
            "/tenants/{tenant_id}/financial-entries/{financial_entry_id}/post",
            post(post_financial_entry),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for recording and posting a financial entry.
#[derive(Debug, Deserialize)]
pub struct CreateFinancialEntryRequest {
    /// Entry kind.
    pub tipo: OriginKind,
    /// Description, copied to the journal narrative.
    pub descricao: String,
    /// Amount; its absolute value is stored.
    pub valor: Decimal,
    /// Posting date.
    pub data_lancamento: NaiveDate,
    /// Due date.
    pub data_vencimento: Option<NaiveDate>,
    /// Customer or supplier.
    pub entidade_id: Option<EntityId>,
    /// Financial category.
    pub categoria_id: Option<CategoryId>,
    /// Subtype.
    pub subtipo: Option<String>,
    /// Bank or cash account.
    pub conta_financeira_id: Option<FinancialAccountId>,
}

impl CreateFinancialEntryRequest {
    fn into_input(self) -> Result<NewFinancialEntry, AppError> {
        let description = self.descricao.trim();
        if description.is_empty() {
            return Err(AppError::Validation("descricao is required".to_string()));
        }

        Ok(NewFinancialEntry {
            kind: self.tipo,
            entity_id: self.entidade_id,
            category_id: self.categoria_id,
            subtype: self
                .subtipo
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            amount: self.valor,
            posting_date: self.data_lancamento,
            due_date: self.data_vencimento,
            description: description.to_string(),
            financial_account_id: self.conta_financeira_id,
        })
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/tenants/{tenant_id}/financial-entries` - Record and post.
async fn create_financial_entry(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CreateFinancialEntryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(tenant_id) = path?;
    let tenant_id = PostingService::validate_tenant(TenantId::new(tenant_id))?;
    let Json(payload) = payload?;
    let input = payload.into_input()?;

    let posting = PostingRepository::new((*state.db).clone());
    let created = posting.create_and_post(tenant_id, &input).await?;

    let entry = &created.financial_entry;
    let financial_entry = json!({
        "id": entry.id,
        "tipo": entry.kind,
        "descricao": entry.description,
        "valor": format_amount(entry.amount),
        "data_lancamento": entry.posting_date,
        "data_vencimento": entry.due_date,
        "status": entry.status,
        "entidade_id": entry.entity_id,
        "categoria_id": entry.category_id,
        "subtipo": entry.subtype,
        "conta_financeira_id": entry.financial_account_id,
    });
    let journal_entry_id = created.journal.id();

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "financial_entry_id": entry.id,
            "journal_entry_id": journal_entry_id,
            "already_exists": false,
            "financial_entry": financial_entry,
            "journal_entry": journal_to_response(created.journal),
        })),
    ))
}

/// POST `/tenants/{tenant_id}/financial-entries/{financial_entry_id}/post` - Post an existing entry.
async fn post_financial_entry(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path((tenant_id, financial_entry_id)) = path?;
    let tenant_id = PostingService::validate_tenant(TenantId::new(tenant_id))?;

    let posting = PostingRepository::new((*state.db).clone());
    let posted = posting
        .post_financial_entry(tenant_id, FinancialEntryId::new(financial_entry_id))
        .await?;

    let journal_entry_id = posted.id();
    let already_exists = posted.already_exists;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "journal_entry_id": journal_entry_id,
            "already_exists": already_exists,
            "journal_entry": journal_to_response(posted),
        })),
    ))
}
