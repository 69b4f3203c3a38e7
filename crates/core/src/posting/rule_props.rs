//! Property-based tests for accounting rule selection.

use proptest::prelude::*;
use partida_shared::types::{AccountingRuleId, CategoryId, LedgerAccountId, TenantId};

use super::rule::select_rule;
use super::types::{AccountingRule, MatchedBy, OriginKind, RuleQuery};

const CATEGORY: i64 = 10;
const SUBTYPE: &str = "principal";

/// How a generated rule keys itself.
#[derive(Debug, Clone, Copy)]
enum Key {
    Category,
    OtherCategory,
    Subtype,
}

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![Just(Key::Category), Just(Key::OtherCategory), Just(Key::Subtype)]
}

fn make_rule(id: i64, key: Key, selectable: bool) -> AccountingRule {
    let (category_id, subtype) = match key {
        Key::Category => (Some(CategoryId::new(CATEGORY)), None),
        Key::OtherCategory => (Some(CategoryId::new(CATEGORY + 1)), None),
        Key::Subtype => (None, Some(SUBTYPE.to_string())),
    };
    AccountingRule {
        id: AccountingRuleId::new(id),
        tenant_id: TenantId::new(1),
        origin: OriginKind::ContaAPagar,
        category_id,
        subtype,
        debit_account_id: LedgerAccountId::new(1000 + id),
        credit_account_id: LedgerAccountId::new(2000 + id),
        description: None,
        automatic: true,
        active: selectable,
    }
}

/// Rules with unique ids, in arbitrary order.
fn rules_strategy() -> impl Strategy<Value = Vec<AccountingRule>> {
    prop::collection::btree_map(1i64..500, (key_strategy(), any::<bool>()), 0..12).prop_flat_map(
        |by_id| {
            let rules: Vec<_> = by_id
                .into_iter()
                .map(|(id, (key, selectable))| make_rule(id, key, selectable))
                .collect();
            Just(rules).prop_shuffle()
        },
    )
}

fn query() -> RuleQuery {
    RuleQuery {
        tenant_id: TenantId::new(1),
        origin: OriginKind::ContaAPagar,
        category_id: Some(CategoryId::new(CATEGORY)),
        subtype: Some(SUBTYPE.to_string()),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The selected rule is the lowest-id selectable category match, or the
    /// lowest-id selectable subtype match when no category rule exists.
    #[test]
    fn prop_selection_follows_precedence(rules in rules_strategy()) {
        let min_id = |key: fn(&AccountingRule) -> bool| {
            rules
                .iter()
                .filter(|r| r.is_selectable() && key(r))
                .map(|r| r.id)
                .min()
        };
        let by_category = min_id(|r| r.category_id == Some(CategoryId::new(CATEGORY)));
        let by_subtype = min_id(|r| r.subtype.as_deref() == Some(SUBTYPE));

        let result = select_rule(&rules, &query());

        match (by_category, by_subtype) {
            (Some(id), _) => {
                let selected = result.unwrap();
                prop_assert_eq!(selected.rule_id, id);
                prop_assert_eq!(selected.matched_by, MatchedBy::Category);
            }
            (None, Some(id)) => {
                let selected = result.unwrap();
                prop_assert_eq!(selected.rule_id, id);
                prop_assert_eq!(selected.matched_by, MatchedBy::Subtype);
            }
            (None, None) => prop_assert!(result.is_err()),
        }
    }

    /// Selection does not depend on the order candidates are listed in.
    #[test]
    fn prop_selection_is_order_independent(rules in rules_strategy()) {
        let mut reversed = rules.clone();
        reversed.reverse();

        let forward = select_rule(&rules, &query()).ok().map(|m| m.rule_id);
        let backward = select_rule(&reversed, &query()).ok().map(|m| m.rule_id);

        prop_assert_eq!(forward, backward);
    }
}
