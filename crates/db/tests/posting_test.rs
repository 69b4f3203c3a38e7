//! Posting pipeline tests against an in-memory SQLite database.
//!
//! Covers create-and-post, posting existing entries, the idempotency guard
//! and its unique-index backstop, atomicity and event delivery outcomes.

mod common;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use serde_json::json;

use common::{
    CATEGORY, EXPENSE_ACCOUNT, PAYABLE_ACCOUNT, TENANT, create_payable_rule, record_entry,
    rent_entry, rule_input, setup_db, setup_with_accounts,
};
use partida_core::posting::{
    DeliveryOutcome, EventEnvelope, FailureReason, OriginKind, PostingError, PostingService,
    SkipReason,
};
use partida_db::AccountingError;
use partida_db::entities::{lancamentos_contabeis, lancamentos_contabeis_linhas, lancamentos_financeiros};
use partida_db::repositories::{
    AccountingRuleRepository, FinancialEntryRepository, JournalRepository, PostingRepository,
};
use partida_shared::types::{EntityId, FinancialEntryId, LedgerAccountId, TenantId};

async fn journal_count(db: &sea_orm::DatabaseConnection) -> u64 {
    lancamentos_contabeis::Entity::find().count(db).await.unwrap()
}

async fn line_count(db: &sea_orm::DatabaseConnection) -> u64 {
    lancamentos_contabeis_linhas::Entity::find().count(db).await.unwrap()
}

fn envelope(financial_entry_id: FinancialEntryId, tenant_id: TenantId) -> EventEnvelope {
    serde_json::from_value(json!({
        "name": "financial_entry_created",
        "id": "delivery-1",
        "data": {
            "financial_entry_id": financial_entry_id.get(),
            "tenant_id": tenant_id.get(),
            "valor": "999.99"
        }
    }))
    .unwrap()
}

// ============================================================================
// Create and post
// ============================================================================

#[tokio::test]
async fn test_create_and_post_example_scenario() {
    let db = setup_with_accounts().await;
    create_payable_rule(&db).await;
    let posting = PostingRepository::new(db.clone());

    let created = posting
        .create_and_post(TENANT, &rent_entry(dec!(850.50)))
        .await
        .unwrap();

    let header = &created.journal.entry;
    assert!(!created.journal.already_exists);
    assert_eq!(header.tenant_id, 1);
    assert_eq!(header.total_debitos, dec!(850.50));
    assert_eq!(header.total_creditos, dec!(850.50));
    assert_eq!(header.lancamento_financeiro_id, Some(created.financial_entry.id.get()));
    assert_eq!(header.fornecedor_id, Some(12));
    assert_eq!(header.cliente_id, None);
    assert_eq!(header.historico, "Aluguel março");

    let lines = &created.journal.lines;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].conta_id, EXPENSE_ACCOUNT.get());
    assert_eq!(lines[0].debito, dec!(850.50));
    assert_eq!(lines[0].credito, Decimal::ZERO);
    assert_eq!(lines[1].conta_id, PAYABLE_ACCOUNT.get());
    assert_eq!(lines[1].debito, Decimal::ZERO);
    assert_eq!(lines[1].credito, dec!(850.50));

    // Read back from storage
    let stored = JournalRepository::new(db.clone())
        .get(TENANT, created.journal.id())
        .await
        .unwrap();
    let debit: Decimal = stored.lines.iter().map(|l| l.debito).sum();
    let credit: Decimal = stored.lines.iter().map(|l| l.credito).sum();
    assert_eq!(debit, credit);
    assert_eq!(debit, stored.entry.total_debitos);
}

#[tokio::test]
async fn test_create_and_post_stores_absolute_amount() {
    let db = setup_with_accounts().await;
    create_payable_rule(&db).await;

    let created = PostingRepository::new(db.clone())
        .create_and_post(TENANT, &rent_entry(dec!(-120.00)))
        .await
        .unwrap();

    assert_eq!(created.financial_entry.amount, dec!(120));
    assert_eq!(created.journal.entry.total_debitos, dec!(120));

    let stored = lancamentos_financeiros::Entity::find_by_id(created.financial_entry.id.get())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.valor, dec!(120));
    assert_eq!(stored.status, "pendente");
}

#[tokio::test]
async fn test_create_and_post_without_rule_writes_nothing() {
    let db = setup_with_accounts().await;

    let result = PostingRepository::new(db.clone())
        .create_and_post(TENANT, &rent_entry(dec!(850.50)))
        .await;

    assert!(matches!(
        result,
        Err(AccountingError::Posting(PostingError::NoActiveRule { .. }))
    ));
    assert_eq!(journal_count(&db).await, 0);
    assert_eq!(line_count(&db).await, 0);
    assert_eq!(lancamentos_financeiros::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_and_post_rejects_zero_amount() {
    let db = setup_with_accounts().await;
    create_payable_rule(&db).await;

    let result = PostingRepository::new(db.clone())
        .create_and_post(TENANT, &rent_entry(Decimal::ZERO))
        .await;

    assert!(matches!(result, Err(AccountingError::Posting(PostingError::ZeroAmount))));
    assert_eq!(lancamentos_financeiros::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_and_post_rejects_sub_cent_amount() {
    let db = setup_with_accounts().await;
    create_payable_rule(&db).await;

    let result = PostingRepository::new(db.clone())
        .create_and_post(TENANT, &rent_entry(dec!(0.004)))
        .await;

    assert!(matches!(
        result,
        Err(AccountingError::Posting(PostingError::InvalidAmountPrecision { .. }))
    ));
    assert_eq!(lancamentos_financeiros::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(journal_count(&db).await, 0);
}

#[tokio::test]
async fn test_create_and_post_rejects_amount_beyond_ledger_columns() {
    let db = setup_with_accounts().await;
    create_payable_rule(&db).await;

    let result = PostingRepository::new(db.clone())
        .create_and_post(TENANT, &rent_entry(dec!(10_000_000_000_000)))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, AccountingError::Posting(PostingError::AmountOutOfRange(_))));
    assert_eq!(err.http_status_code(), 400);
    assert!(!err.is_retryable());
    assert_eq!(lancamentos_financeiros::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_receivable_posts_customer() {
    let db = setup_with_accounts().await;
    AccountingRuleRepository::new(db.clone())
        .create(
            TENANT,
            rule_input(
                OriginKind::ContaAReceber,
                None,
                Some("principal"),
                PAYABLE_ACCOUNT,
                EXPENSE_ACCOUNT,
            ),
        )
        .await
        .unwrap();

    let mut input = rent_entry(dec!(40));
    input.kind = OriginKind::ContaAReceber;
    input.category_id = None;
    input.subtype = Some("principal".to_string());
    input.entity_id = Some(EntityId::new(55));

    let created = PostingRepository::new(db.clone())
        .create_and_post(TENANT, &input)
        .await
        .unwrap();

    assert_eq!(created.journal.entry.cliente_id, Some(55));
    assert_eq!(created.journal.entry.fornecedor_id, None);
}

// ============================================================================
// Post existing entry
// ============================================================================

#[tokio::test]
async fn test_post_existing_entry_is_idempotent() {
    let db = setup_with_accounts().await;
    create_payable_rule(&db).await;
    let entry_id = record_entry(&db, &rent_entry(dec!(850.50))).await;
    let posting = PostingRepository::new(db.clone());

    let first = posting.post_financial_entry(TENANT, entry_id).await.unwrap();
    let second = posting.post_financial_entry(TENANT, entry_id).await.unwrap();

    assert!(!first.already_exists);
    assert!(second.already_exists);
    assert_eq!(first.id(), second.id());
    assert_eq!(second.lines.len(), 2);
    assert_eq!(journal_count(&db).await, 1);
    assert_eq!(line_count(&db).await, 2);

    let journal = JournalRepository::new(db.clone());
    assert!(journal.has_existing_posting(TENANT, entry_id).await.unwrap());
    assert!(!journal
        .has_existing_posting(TenantId::new(2), entry_id)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_post_missing_entry() {
    let db = setup_with_accounts().await;

    let result = PostingRepository::new(db.clone())
        .post_financial_entry(TENANT, FinancialEntryId::new(404))
        .await;

    assert!(matches!(
        result,
        Err(AccountingError::Posting(PostingError::FinancialEntryNotFound(id))) if id.get() == 404
    ));
}

#[tokio::test]
async fn test_post_existing_entry_without_rule_writes_nothing() {
    let db = setup_with_accounts().await;
    let entry_id = record_entry(&db, &rent_entry(dec!(850.50))).await;

    let result = PostingRepository::new(db.clone())
        .post_financial_entry(TENANT, entry_id)
        .await;

    assert!(matches!(
        result,
        Err(AccountingError::Posting(PostingError::NoActiveRule { .. }))
    ));
    assert_eq!(journal_count(&db).await, 0);
    assert_eq!(line_count(&db).await, 0);
}

#[tokio::test]
async fn test_failed_line_insert_rolls_back_header() {
    let db = setup_with_accounts().await;
    // Credit account 999 is missing from the chart of accounts
    AccountingRuleRepository::new(db.clone())
        .create(
            TENANT,
            rule_input(
                OriginKind::ContaAPagar,
                Some(CATEGORY),
                None,
                EXPENSE_ACCOUNT,
                LedgerAccountId::new(999),
            ),
        )
        .await
        .unwrap();
    let entry_id = record_entry(&db, &rent_entry(dec!(850.50))).await;

    let result = PostingRepository::new(db.clone())
        .post_financial_entry(TENANT, entry_id)
        .await;

    // The insert failure surfaces, not a rollback error
    match result {
        Err(AccountingError::Database(err)) => {
            assert!(err.to_string().contains("FOREIGN KEY"), "{err}");
        }
        other => panic!("expected a database error, got {other:?}"),
    }
    assert_eq!(journal_count(&db).await, 0);
    assert_eq!(line_count(&db).await, 0);
}

#[tokio::test]
async fn test_unbalanced_header_is_rejected_by_the_schema() {
    let db = setup_with_accounts().await;
    let entry_id = record_entry(&db, &rent_entry(dec!(850.50))).await;

    let result = lancamentos_contabeis::ActiveModel {
        tenant_id: Set(TENANT.get()),
        data_lancamento: Set(chrono::NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()),
        historico: Set("Aluguel março".to_string()),
        total_debitos: Set(dec!(850.50)),
        total_creditos: Set(dec!(850.00)),
        lancamento_financeiro_id: Set(Some(entry_id.get())),
        criado_em: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&db)
    .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("CHECK"), "{err}");
    assert_eq!(journal_count(&db).await, 0);
}

#[tokio::test]
async fn test_write_of_unbalanced_draft_keeps_the_insert_error() {
    let db = setup_with_accounts().await;
    create_payable_rule(&db).await;
    let entry_id = record_entry(&db, &rent_entry(dec!(850.50))).await;

    let entry = FinancialEntryRepository::new(db.clone())
        .find_by_id(TENANT, entry_id)
        .await
        .unwrap()
        .unwrap();
    let rule = AccountingRuleRepository::new(db.clone())
        .resolve_rule(&entry.rule_query())
        .await
        .unwrap();
    let mut draft = PostingService::draft_journal(&entry, &rule).unwrap();
    draft.totals.credit += dec!(1);

    let result = JournalRepository::new(db.clone()).write(&draft).await;

    match result {
        Err(AccountingError::Database(err)) => assert!(err.to_string().contains("CHECK"), "{err}"),
        other => panic!("expected a database error, got {other:?}"),
    }
    assert_eq!(journal_count(&db).await, 0);
    assert_eq!(line_count(&db).await, 0);
}

#[tokio::test]
async fn test_unique_index_backstops_the_guard() {
    let db = setup_with_accounts().await;
    create_payable_rule(&db).await;
    let entry_id = record_entry(&db, &rent_entry(dec!(850.50))).await;

    // A concurrent poster won the race after this one passed the guard
    let winner = lancamentos_contabeis::ActiveModel {
        tenant_id: Set(TENANT.get()),
        data_lancamento: Set(chrono::NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()),
        historico: Set("Aluguel março".to_string()),
        total_debitos: Set(dec!(850.50)),
        total_creditos: Set(dec!(850.50)),
        lancamento_financeiro_id: Set(Some(entry_id.get())),
        criado_em: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let entry = FinancialEntryRepository::new(db.clone())
        .find_by_id(TENANT, entry_id)
        .await
        .unwrap()
        .unwrap();
    let rule = AccountingRuleRepository::new(db.clone())
        .resolve_rule(&entry.rule_query())
        .await
        .unwrap();
    let draft = PostingService::draft_journal(&entry, &rule).unwrap();

    let posted = JournalRepository::new(db.clone()).write(&draft).await.unwrap();

    assert!(posted.already_exists);
    assert_eq!(posted.entry.id, winner.id);
    assert_eq!(journal_count(&db).await, 1);
    assert_eq!(line_count(&db).await, 0);
}

// ============================================================================
// Event delivery
// ============================================================================

#[tokio::test]
async fn test_event_posts_then_skips_redelivery() {
    let db = setup_with_accounts().await;
    create_payable_rule(&db).await;
    let entry_id = record_entry(&db, &rent_entry(dec!(850.50))).await;
    let posting = PostingRepository::new(db.clone());

    let first = posting.handle_event(envelope(entry_id, TENANT)).await.unwrap();
    let second = posting.handle_event(envelope(entry_id, TENANT)).await.unwrap();

    let DeliveryOutcome::Posted { journal_entry_id } = first else {
        panic!("expected posted, got {first:?}");
    };
    assert_eq!(
        second,
        DeliveryOutcome::Skipped {
            reason: SkipReason::AlreadyPosted,
            journal_entry_id: Some(journal_entry_id),
        }
    );
    assert_eq!(journal_count(&db).await, 1);

    // Payload amount is ignored; the stored fact is posted
    let stored = JournalRepository::new(db.clone())
        .get(TENANT, journal_entry_id)
        .await
        .unwrap();
    assert_eq!(stored.entry.total_debitos, dec!(850.50));
}

#[tokio::test]
async fn test_event_for_missing_entry_is_skipped() {
    let db = setup_db().await;

    let outcome = PostingRepository::new(db.clone())
        .handle_event(envelope(FinancialEntryId::new(77), TENANT))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DeliveryOutcome::Skipped {
            reason: SkipReason::NotFound,
            journal_entry_id: None,
        }
    );
    assert_eq!(outcome.http_status_code(), 200);
}

#[tokio::test]
async fn test_event_with_foreign_tenant_is_treated_as_not_found() {
    let db = setup_with_accounts().await;
    create_payable_rule(&db).await;
    let entry_id = record_entry(&db, &rent_entry(dec!(850.50))).await;

    let outcome = PostingRepository::new(db.clone())
        .handle_event(envelope(entry_id, TenantId::new(2)))
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        DeliveryOutcome::Skipped { reason: SkipReason::NotFound, .. }
    ));
    assert_eq!(journal_count(&db).await, 0);
}

#[tokio::test]
async fn test_event_without_rule_fails_permanently() {
    let db = setup_with_accounts().await;
    let entry_id = record_entry(&db, &rent_entry(dec!(850.50))).await;

    let outcome = PostingRepository::new(db.clone())
        .handle_event(envelope(entry_id, TENANT))
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        DeliveryOutcome::Failed { reason: FailureReason::NoRule, .. }
    ));
    assert_eq!(outcome.http_status_code(), 422);
    assert_eq!(journal_count(&db).await, 0);
}

#[tokio::test]
async fn test_unknown_event_is_rejected() {
    let db = setup_db().await;
    let envelope: EventEnvelope = serde_json::from_value(json!({
        "name": "invoice_issued",
        "data": {}
    }))
    .unwrap();

    let result = PostingRepository::new(db.clone()).handle_event(envelope).await;

    let err = result.unwrap_err();
    assert_eq!(err.http_status_code(), 400);
    assert_eq!(err.error_code(), "UNKNOWN_EVENT");
}

// ============================================================================
// Read-back
// ============================================================================

#[tokio::test]
async fn test_list_orders_by_date_desc_then_id() {
    let db = setup_with_accounts().await;
    create_payable_rule(&db).await;
    let posting = PostingRepository::new(db.clone());

    let mut ids = Vec::new();
    for (day, amount) in [(1, dec!(10)), (20, dec!(20)), (20, dec!(30))] {
        let mut input = rent_entry(amount);
        input.posting_date = chrono::NaiveDate::from_ymd_opt(2026, 4, day).unwrap();
        let created = posting.create_and_post(TENANT, &input).await.unwrap();
        ids.push(created.journal.id().get());
    }

    let journal = JournalRepository::new(db.clone());
    let page = journal
        .list(TENANT, partida_shared::types::PageRequest { page: 1, per_page: 2 })
        .await
        .unwrap();

    assert_eq!(page.meta.total, 3);
    assert_eq!(page.meta.total_pages, 2);
    let listed: Vec<i64> = page.data.iter().map(|e| e.id).collect();
    assert_eq!(listed, vec![ids[1], ids[2]]);

    let second = journal
        .list(TENANT, partida_shared::types::PageRequest { page: 2, per_page: 2 })
        .await
        .unwrap();
    assert_eq!(second.data.len(), 1);
    assert_eq!(second.data[0].id, ids[0]);
}

#[tokio::test]
async fn test_get_journal_of_other_tenant() {
    let db = setup_with_accounts().await;
    create_payable_rule(&db).await;
    let created = PostingRepository::new(db.clone())
        .create_and_post(TENANT, &rent_entry(dec!(10)))
        .await
        .unwrap();

    let result = JournalRepository::new(db.clone())
        .get(TenantId::new(2), created.journal.id())
        .await;

    assert!(matches!(
        result,
        Err(AccountingError::Posting(PostingError::JournalEntryNotFound(_)))
    ));
}
