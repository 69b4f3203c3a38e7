//! Journal read-back routes.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;

use partida_core::posting::PostingService;
use partida_db::entities::{lancamentos_contabeis, lancamentos_contabeis_linhas};
use partida_db::repositories::{JournalRepository, PostedJournal};
use partida_shared::types::{JournalEntryId, PageRequest, TenantId};

use crate::{AppState, error::ApiError};

/// Creates the journal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tenants/{tenant_id}/journal-entries", get(list_journal_entries))
        .route(
            "/tenants/{tenant_id}/journal-entries/{journal_entry_id}",
            get(get_journal_entry),
        )
}

// ============================================================================
// Response Types
// ============================================================================

/// Journal header.
#[derive(Debug, Serialize)]
pub struct JournalEntryResponse {
    /// Journal entry id.
    pub id: i64,
    /// Owning tenant.
    pub tenant_id: i64,
    /// Posting date.
    pub data_lancamento: NaiveDate,
    /// Narrative.
    pub historico: String,
    /// Customer, for receivable-side postings.
    pub cliente_id: Option<i64>,
    /// Supplier, for payable-side postings.
    pub fornecedor_id: Option<i64>,
    /// Bank or cash account.
    pub conta_financeira_id: Option<i64>,
    /// Sum of debits.
    pub total_debitos: String,
    /// Sum of credits.
    pub total_creditos: String,
    /// Source financial entry.
    pub lancamento_financeiro_id: Option<i64>,
    /// Creation timestamp.
    pub criado_em: String,
    /// Lines, when requested with the header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linhas: Option<Vec<JournalLineResponse>>,
}

/// Journal line.
#[derive(Debug, Serialize)]
pub struct JournalLineResponse {
    /// Line id.
    pub id: i64,
    /// Account moved.
    pub conta_id: i64,
    /// Debit amount.
    pub debito: String,
    /// Credit amount.
    pub credito: String,
    /// Line narrative.
    pub historico: Option<String>,
}

/// Formats a monetary amount with two decimal places.
pub(crate) fn format_amount(amount: Decimal) -> String {
    let mut amount = amount.round_dp(2);
    amount.rescale(2);
    amount.to_string()
}

fn header_to_response(entry: lancamentos_contabeis::Model) -> JournalEntryResponse {
    JournalEntryResponse {
        id: entry.id,
        tenant_id: entry.tenant_id,
        data_lancamento: entry.data_lancamento,
        historico: entry.historico,
        cliente_id: entry.cliente_id,
        fornecedor_id: entry.fornecedor_id,
        conta_financeira_id: entry.conta_financeira_id,
        total_debitos: format_amount(entry.total_debitos),
        total_creditos: format_amount(entry.total_creditos),
        lancamento_financeiro_id: entry.lancamento_financeiro_id,
        criado_em: entry.criado_em.to_rfc3339(),
        linhas: None,
    }
}

fn line_to_response(line: lancamentos_contabeis_linhas::Model) -> JournalLineResponse {
    JournalLineResponse {
        id: line.id,
        conta_id: line.conta_id,
        debito: format_amount(line.debito),
        credito: format_amount(line.credito),
        historico: line.historico,
    }
}

/// Header and lines of a posted journal entry.
pub(crate) fn journal_to_response(posted: PostedJournal) -> JournalEntryResponse {
    let lines = posted.lines.into_iter().map(line_to_response).collect();
    JournalEntryResponse {
        linhas: Some(lines),
        ..header_to_response(posted.entry)
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/tenants/{tenant_id}/journal-entries` - List journal headers.
async fn list_journal_entries(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    page: Result<Query<PageRequest>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(tenant_id) = path?;
    let tenant_id = PostingService::validate_tenant(TenantId::new(tenant_id))?;
    let Query(page) = page?;

    let repo = JournalRepository::new((*state.db).clone());
    let page = repo.list(tenant_id, page).await?;

    let data: Vec<JournalEntryResponse> = page.data.into_iter().map(header_to_response).collect();

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": data,
            "meta": page.meta,
        })),
    ))
}

/// GET `/tenants/{tenant_id}/journal-entries/{journal_entry_id}` - Header and lines.
async fn get_journal_entry(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path((tenant_id, journal_entry_id)) = path?;
    let tenant_id = PostingService::validate_tenant(TenantId::new(tenant_id))?;

    let repo = JournalRepository::new((*state.db).clone());
    let posted = repo
        .get(tenant_id, JournalEntryId::new(journal_entry_id))
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": journal_to_response(posted),
        })),
    ))
}
