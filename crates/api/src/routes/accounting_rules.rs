//! Accounting rule routes.
//!
//! Rules map a financial entry kind plus a category or subtype to a debit
//! and a credit account. The resolve route answers which rule an entry with
//! the given keys would be posted with.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::{JsonRejection, PathRejection, QueryRejection}},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use partida_core::posting::{OriginKind, PostingService, RuleQuery};
use partida_db::entities::{plano_contas, regras_contabeis};
use partida_db::repositories::{AccountingRuleRepository, CreateAccountingRuleInput};
use partida_shared::AppError;
use partida_shared::types::{CategoryId, LedgerAccountId, TenantId};

use crate::{AppState, error::ApiError};

/// Creates the accounting rule routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/accounting-rules",
            get(list_rules).post(create_rule),
        )
        .route(
            "/tenants/{tenant_id}/accounting-rules/resolve",
            get(resolve_rule),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Filter for listing rules.
#[derive(Debug, Deserialize)]
pub struct ListRulesQuery {
    /// Only rules of this kind.
    pub origem: Option<String>,
}

/// Request body for creating a rule.
#[derive(Debug, Deserialize)]
pub struct CreateRuleRequest {
    /// Entry kind the rule applies to.
    pub origem: OriginKind,
    /// Category match key.
    pub categoria_financeira_id: Option<CategoryId>,
    /// Subtype match key.
    pub subtipo: Option<String>,
    /// Account debited.
    pub conta_debito_id: LedgerAccountId,
    /// Account credited.
    pub conta_credito_id: LedgerAccountId,
    /// Description.
    pub descricao: Option<String>,
    /// Defaults to true.
    #[serde(default = "default_true")]
    pub automatico: bool,
    /// Defaults to true.
    #[serde(default = "default_true")]
    pub ativo: bool,
}

const fn default_true() -> bool {
    true
}

/// Resolution key.
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// Entry kind.
    pub origem: String,
    /// Category.
    pub categoria_id: Option<CategoryId>,
    /// Subtype.
    pub subtipo: Option<String>,
}

/// Account summary in a resolution.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account id.
    pub id: i64,
    /// Account code.
    pub codigo: String,
    /// Account name.
    pub nome: String,
}

impl From<plano_contas::Model> for AccountResponse {
    fn from(account: plano_contas::Model) -> Self {
        Self {
            id: account.id,
            codigo: account.codigo,
            nome: account.nome,
        }
    }
}

fn parse_origin(raw: &str) -> Result<OriginKind, ApiError> {
    raw.parse::<OriginKind>()
        .map_err(|_| AppError::Validation(format!("unknown origem: {raw}")).into())
}

fn rule_to_json(rule: &regras_contabeis::Model) -> serde_json::Value {
    json!({
        "id": rule.id,
        "origem": rule.origem,
        "categoria_financeira_id": rule.categoria_financeira_id,
        "subtipo": rule.subtipo,
        "conta_debito_id": rule.conta_debito_id,
        "conta_credito_id": rule.conta_credito_id,
        "descricao": rule.descricao,
        "automatico": rule.automatico,
        "ativo": rule.ativo,
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/tenants/{tenant_id}/accounting-rules` - List rules.
async fn list_rules(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    filter: Result<Query<ListRulesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(tenant_id) = path?;
    let tenant_id = PostingService::validate_tenant(TenantId::new(tenant_id))?;
    let Query(filter) = filter?;
    let origin = filter.origem.as_deref().map(parse_origin).transpose()?;

    let repo = AccountingRuleRepository::new((*state.db).clone());
    let rules = repo.list(tenant_id, origin).await?;

    let data: Vec<_> = rules.iter().map(rule_to_json).collect();

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": data,
        })),
    ))
}

/// POST `/tenants/{tenant_id}/accounting-rules` - Create a rule.
async fn create_rule(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CreateRuleRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(tenant_id) = path?;
    let tenant_id = PostingService::validate_tenant(TenantId::new(tenant_id))?;
    let Json(payload) = payload?;

    let repo = AccountingRuleRepository::new((*state.db).clone());
    let rule = repo
        .create(
            tenant_id,
            CreateAccountingRuleInput {
                origin: payload.origem,
                category_id: payload.categoria_financeira_id,
                subtype: payload.subtipo,
                debit_account_id: payload.conta_debito_id,
                credit_account_id: payload.conta_credito_id,
                description: payload.descricao,
                automatic: payload.automatico,
                active: payload.ativo,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": rule_to_json(&rule),
        })),
    ))
}

/// GET `/tenants/{tenant_id}/accounting-rules/resolve` - Resolve a rule.
async fn resolve_rule(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<ResolveQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(tenant_id) = path?;
    let tenant_id = PostingService::validate_tenant(TenantId::new(tenant_id))?;
    let Query(query) = query?;

    let rule_query = RuleQuery {
        tenant_id,
        origin: parse_origin(&query.origem)?,
        category_id: query.categoria_id,
        subtype: query
            .subtipo
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };

    let repo = AccountingRuleRepository::new((*state.db).clone());
    let lookup = repo.lookup(&rule_query).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "rule": rule_to_json(&lookup.rule),
                "matched_by": lookup.matched_by,
                "conta_debito": lookup.debit_account.map(AccountResponse::from),
                "conta_credito": lookup.credit_account.map(AccountResponse::from),
            },
        })),
    ))
}
