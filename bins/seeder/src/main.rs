//! Database seeder for Partida development and testing.
//!
//! Seeds a chart of accounts, accounting rules for every entry kind and a
//! few posted financial entries for tenant 1.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use partida_core::posting::OriginKind;
use partida_db::migration::{Migrator, MigratorTrait};
use partida_db::repositories::{
    AccountingRuleRepository, CreateAccountingRuleInput, CreateLedgerAccountInput,
    LedgerAccountRepository, NewFinancialEntry, PostingRepository,
};
use partida_db::{AccountingError, connect};
use partida_shared::AppConfig;
use partida_shared::types::{CategoryId, EntityId, LedgerAccountId, TenantId};
use sea_orm::DatabaseConnection;

/// Tenant the seed data belongs to.
const TENANT: TenantId = TenantId::new(1);

/// (id, codigo, nome, tipo_conta)
const ACCOUNTS: &[(i64, &str, &str, &str)] = &[
    (101, "1.1.01", "Caixa e bancos", "Ativo"),
    (102, "1.1.02", "Clientes a receber", "Ativo"),
    (202, "2.1.01", "Fornecedores a pagar", "Passivo"),
    (301, "4.1.01", "Despesas com aluguel", "Despesa"),
    (302, "4.1.02", "Despesas com servicos", "Despesa"),
    (401, "3.1.01", "Receita de vendas", "Receita"),
];

/// Rent category.
const CATEGORY_RENT: i64 = 10;
/// Sales category.
const CATEGORY_SALES: i64 = 20;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None).await?;

    println!("Seeding chart of accounts...");
    if !seed_accounts(&db).await? {
        println!("  Chart of accounts already exists, skipping...");
        println!("Seeding complete!");
        return Ok(());
    }

    println!("Seeding accounting rules...");
    seed_rules(&db).await?;

    println!("Seeding financial entries...");
    seed_entries(&db).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Returns false when the tenant already has accounts.
async fn seed_accounts(db: &DatabaseConnection) -> anyhow::Result<bool> {
    let repo = LedgerAccountRepository::new(db.clone());
    if !repo.list(TENANT).await?.is_empty() {
        return Ok(false);
    }

    for &(id, codigo, nome, tipo_conta) in ACCOUNTS {
        repo.create(
            TENANT,
            CreateLedgerAccountInput {
                id: Some(LedgerAccountId::new(id)),
                codigo: codigo.to_string(),
                nome: nome.to_string(),
                tipo_conta: tipo_conta.to_string(),
            },
        )
        .await?;
        println!("  {codigo} {nome}");
    }

    Ok(true)
}

async fn seed_rules(db: &DatabaseConnection) -> Result<(), AccountingError> {
    let repo = AccountingRuleRepository::new(db.clone());

    let rules = [
        (OriginKind::ContaAPagar, Some(CATEGORY_RENT), None, 301, 202, "Aluguel"),
        (OriginKind::ContaAPagar, None, Some("servico"), 302, 202, "Servicos contratados"),
        (OriginKind::PagamentoEfetuado, None, Some("principal"), 202, 101, "Pagamento a fornecedor"),
        (OriginKind::ContaAReceber, Some(CATEGORY_SALES), None, 102, 401, "Venda a prazo"),
        (OriginKind::PagamentoRecebido, None, Some("principal"), 101, 102, "Recebimento de cliente"),
    ];

    for (origin, category, subtype, debit, credit, description) in rules {
        let rule = repo
            .create(
                TENANT,
                CreateAccountingRuleInput {
                    origin,
                    category_id: category.map(CategoryId::new),
                    subtype: subtype.map(str::to_string),
                    debit_account_id: LedgerAccountId::new(debit),
                    credit_account_id: LedgerAccountId::new(credit),
                    description: Some(description.to_string()),
                    automatic: true,
                    active: true,
                },
            )
            .await?;
        println!("  #{} {origin} -> D {debit} / C {credit}", rule.id);
    }

    Ok(())
}

async fn seed_entries(db: &DatabaseConnection) -> Result<(), AccountingError> {
    let posting = PostingRepository::new(db.clone());

    let entries = [
        entry(OriginKind::ContaAPagar, Some(CATEGORY_RENT), None, dec!(850.50), (2026, 3, 5), "Aluguel março", 12),
        entry(OriginKind::ContaAPagar, None, Some("servico"), dec!(1200.00), (2026, 3, 8), "Manutenção predial", 14),
        entry(OriginKind::PagamentoEfetuado, None, Some("principal"), dec!(850.50), (2026, 3, 10), "Pagamento aluguel março", 12),
        entry(OriginKind::ContaAReceber, Some(CATEGORY_SALES), None, dec!(3400.00), (2026, 3, 12), "Venda pedido 1042", 31),
    ];

    for input in &entries {
        let created = posting.create_and_post(TENANT, input).await?;
        println!(
            "  {} {} -> journal #{}",
            input.kind,
            input.description,
            created.journal.id()
        );
    }

    Ok(())
}

fn entry(
    kind: OriginKind,
    category: Option<i64>,
    subtype: Option<&str>,
    amount: Decimal,
    (year, month, day): (i32, u32, u32),
    description: &str,
    entity: i64,
) -> NewFinancialEntry {
    NewFinancialEntry {
        kind,
        entity_id: Some(EntityId::new(entity)),
        category_id: category.map(CategoryId::new),
        subtype: subtype.map(str::to_string),
        amount,
        posting_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        due_date: None,
        description: description.to_string(),
        financial_account_id: None,
    }
}
