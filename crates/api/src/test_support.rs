//! Fixtures for route tests: an in-memory SQLite database with the schema,
//! a chart of accounts and request helpers.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use tower::ServiceExt;

use partida_core::posting::OriginKind;
use partida_db::migration::{Migrator, MigratorTrait};
use partida_db::repositories::{
    AccountingRuleRepository, CreateAccountingRuleInput, CreateLedgerAccountInput,
    LedgerAccountRepository,
};
use partida_shared::types::{CategoryId, LedgerAccountId, TenantId};

use crate::AppState;

pub const TENANT: TenantId = TenantId::new(1);

pub async fn test_state() -> AppState {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let accounts = LedgerAccountRepository::new(db.clone());
    for (id, codigo, nome, tipo) in [
        (301, "4.1.01", "Despesas com aluguel", "Despesa"),
        (202, "2.1.01", "Fornecedores a pagar", "Passivo"),
    ] {
        accounts
            .create(
                TENANT,
                CreateLedgerAccountInput {
                    id: Some(LedgerAccountId::new(id)),
                    codigo: codigo.to_string(),
                    nome: nome.to_string(),
                    tipo_conta: tipo.to_string(),
                },
            )
            .await
            .unwrap();
    }

    AppState::new(db)
}

/// Payable rule for category 10: debit 301, credit 202.
pub async fn with_payable_rule(state: &AppState) {
    AccountingRuleRepository::new((*state.db).clone())
        .create(
            TENANT,
            CreateAccountingRuleInput {
                origin: OriginKind::ContaAPagar,
                category_id: Some(CategoryId::new(10)),
                subtype: None,
                debit_account_id: LedgerAccountId::new(301),
                credit_account_id: LedgerAccountId::new(202),
                description: Some("Aluguel".to_string()),
                automatic: true,
                active: true,
            },
        )
        .await
        .unwrap();
}

pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
