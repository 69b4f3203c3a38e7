//! Shared fixtures for repository tests.
//!
//! Each test gets its own in-memory SQLite database with the full schema
//! applied by the migrator.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};

use partida_core::posting::OriginKind;
use partida_db::migration::{Migrator, MigratorTrait};
use partida_db::repositories::{
    AccountingRuleRepository, CreateAccountingRuleInput, CreateLedgerAccountInput,
    FinancialEntryRepository, LedgerAccountRepository, NewFinancialEntry,
};
use partida_shared::types::{CategoryId, EntityId, FinancialEntryId, LedgerAccountId, TenantId};

pub const TENANT: TenantId = TenantId::new(1);
pub const EXPENSE_ACCOUNT: LedgerAccountId = LedgerAccountId::new(301);
pub const PAYABLE_ACCOUNT: LedgerAccountId = LedgerAccountId::new(202);
pub const CATEGORY: CategoryId = CategoryId::new(10);

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// Database with accounts 301 and 202 and no rules.
pub async fn setup_with_accounts() -> DatabaseConnection {
    let db = setup_db().await;
    let accounts = LedgerAccountRepository::new(db.clone());
    for (id, codigo, nome, tipo) in [
        (EXPENSE_ACCOUNT, "4.1.01", "Despesas com aluguel", "Despesa"),
        (PAYABLE_ACCOUNT, "2.1.01", "Fornecedores a pagar", "Passivo"),
    ] {
        accounts
            .create(
                TENANT,
                CreateLedgerAccountInput {
                    id: Some(id),
                    codigo: codigo.to_string(),
                    nome: nome.to_string(),
                    tipo_conta: tipo.to_string(),
                },
            )
            .await
            .unwrap();
    }
    db
}

pub fn rule_input(
    origin: OriginKind,
    category_id: Option<CategoryId>,
    subtype: Option<&str>,
    debit: LedgerAccountId,
    credit: LedgerAccountId,
) -> CreateAccountingRuleInput {
    CreateAccountingRuleInput {
        origin,
        category_id,
        subtype: subtype.map(str::to_string),
        debit_account_id: debit,
        credit_account_id: credit,
        description: None,
        automatic: true,
        active: true,
    }
}

/// Creates the payable rule: category 10, debit 301, credit 202.
pub async fn create_payable_rule(db: &DatabaseConnection) {
    AccountingRuleRepository::new(db.clone())
        .create(
            TENANT,
            rule_input(
                OriginKind::ContaAPagar,
                Some(CATEGORY),
                None,
                EXPENSE_ACCOUNT,
                PAYABLE_ACCOUNT,
            ),
        )
        .await
        .unwrap();
}

pub fn rent_entry(amount: Decimal) -> NewFinancialEntry {
    NewFinancialEntry {
        kind: OriginKind::ContaAPagar,
        entity_id: Some(EntityId::new(12)),
        category_id: Some(CATEGORY),
        subtype: None,
        amount,
        posting_date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2026, 3, 10),
        description: "Aluguel março".to_string(),
        financial_account_id: None,
    }
}

/// Records an entry without posting it.
pub async fn record_entry(db: &DatabaseConnection, input: &NewFinancialEntry) -> FinancialEntryId {
    FinancialEntryRepository::new(db.clone())
        .create(TENANT, input)
        .await
        .unwrap()
        .id
}
