//! Property-based tests for journal drafting.
//!
//! Every draft the service produces is balanced, has exactly one debit and
//! one credit line, and moves the full entry amount on each side.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use partida_shared::types::{
    AccountingRuleId, CategoryId, EntityId, FinancialEntryId, LedgerAccountId, TenantId,
};

use super::error::PostingError;
use super::journal::EntrySide;
use super::service::PostingService;
use super::types::{FinancialEntry, MatchedBy, OriginKind, RuleAccounts, RuleMatch};
use super::validation::validate_lines;

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // 0.01 to 10,000,000.00
    (1i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn kind_strategy() -> impl Strategy<Value = OriginKind> {
    prop::sample::select(OriginKind::ALL.to_vec())
}

/// Two distinct account ids.
fn account_pair() -> impl Strategy<Value = (i64, i64)> {
    (1i64..10_000, 1i64..10_000).prop_filter("distinct accounts", |(d, c)| d != c)
}

fn make_entry(kind: OriginKind, amount: Decimal) -> FinancialEntry {
    FinancialEntry {
        id: FinancialEntryId::new(1),
        tenant_id: TenantId::new(1),
        kind,
        entity_id: Some(EntityId::new(4)),
        category_id: Some(CategoryId::new(10)),
        subtype: None,
        amount,
        posting_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        due_date: None,
        description: "prop".to_string(),
        financial_account_id: None,
        status: "pendente".to_string(),
    }
}

fn make_rule(debit: i64, credit: i64) -> RuleMatch {
    RuleMatch {
        rule_id: AccountingRuleId::new(1),
        accounts: RuleAccounts::new(LedgerAccountId::new(debit), LedgerAccountId::new(credit))
            .unwrap(),
        matched_by: MatchedBy::Category,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Drafts always balance and total the entry amount.
    #[test]
    fn prop_draft_is_balanced(
        amount in positive_amount(),
        kind in kind_strategy(),
        (debit, credit) in account_pair(),
    ) {
        let draft = PostingService::draft_journal(&make_entry(kind, amount), &make_rule(debit, credit))
            .unwrap();

        prop_assert!(draft.totals.is_balanced());
        prop_assert_eq!(draft.totals.debit, amount);

        let debit_sum: Decimal = draft.lines.iter().map(|l| l.debit).sum();
        let credit_sum: Decimal = draft.lines.iter().map(|l| l.credit).sum();
        prop_assert_eq!(debit_sum, credit_sum);
        prop_assert_eq!(debit_sum, draft.totals.debit);
    }

    /// A draft has one debit line on the debit account, then one credit line
    /// on the credit account.
    #[test]
    fn prop_draft_line_shape(
        amount in positive_amount(),
        (debit, credit) in account_pair(),
    ) {
        let draft = PostingService::draft_journal(
            &make_entry(OriginKind::ContaAPagar, amount),
            &make_rule(debit, credit),
        )
        .unwrap();

        prop_assert_eq!(draft.lines.len(), 2);
        prop_assert_eq!(draft.lines[0].side(), Some(EntrySide::Debit));
        prop_assert_eq!(draft.lines[0].account_id, LedgerAccountId::new(debit));
        prop_assert_eq!(draft.lines[1].side(), Some(EntrySide::Credit));
        prop_assert_eq!(draft.lines[1].account_id, LedgerAccountId::new(credit));
    }

    /// Normalized amounts are positive and equal to the absolute input.
    #[test]
    fn prop_normalize_amount_is_absolute(cents in -1_000_000_000i64..1_000_000_000i64) {
        let raw = Decimal::new(cents, 2);
        match PostingService::normalize_amount(raw) {
            Ok(amount) => {
                prop_assert!(amount > Decimal::ZERO);
                prop_assert_eq!(amount, raw.abs());
            }
            Err(err) => {
                prop_assert!(matches!(err, PostingError::ZeroAmount));
                prop_assert_eq!(cents, 0);
            }
        }
    }

    /// Amounts finer than a cent never reach a draft.
    #[test]
    fn prop_sub_cent_amounts_are_rejected(
        cents in -1_000_000_000i64..1_000_000_000i64,
        fraction in 1i64..10,
    ) {
        let mills = cents * 10 + if cents < 0 { -fraction } else { fraction };
        let raw = Decimal::new(mills, 3);
        prop_assert!(matches!(
            PostingService::normalize_amount(raw),
            Err(PostingError::InvalidAmountPrecision { .. })
        ), "expected InvalidAmountPrecision for {}", raw);
    }

    /// Validation accepts lines iff the columns balance.
    #[test]
    fn prop_validation_detects_imbalance(
        debit_amount in positive_amount(),
        credit_amount in positive_amount(),
    ) {
        use super::journal::JournalLineDraft;

        let lines = vec![
            JournalLineDraft::new(EntrySide::Debit, LedgerAccountId::new(1), debit_amount, ""),
            JournalLineDraft::new(EntrySide::Credit, LedgerAccountId::new(2), credit_amount, ""),
        ];
        let result = validate_lines(&lines);

        if debit_amount == credit_amount {
            prop_assert!(result.is_ok());
        } else {
            let is_unbalanced = matches!(result, Err(PostingError::UnbalancedJournal { .. }));
            prop_assert!(is_unbalanced);
        }
    }
}
