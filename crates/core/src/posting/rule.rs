//! Accounting rule selection.
//!
//! Selection order: an exact category match wins over a subtype match, and
//! among equal matches the lowest rule id wins. The database resolver issues
//! the same two ordered queries; this module states the order over an
//! in-memory candidate list.

use super::error::PostingError;
use super::types::{AccountingRule, MatchedBy, RuleAccounts, RuleMatch, RuleQuery};

/// Selects the rule for `query` from `rules`.
///
/// Rules of other tenants or origins, and rules that are inactive or not
/// automatic, are ignored.
///
/// # Errors
///
/// Returns `NoActiveRule` if nothing matches and `SameDebitCreditAccount` if
/// the selected rule is self-referencing.
pub fn select_rule(rules: &[AccountingRule], query: &RuleQuery) -> Result<RuleMatch, PostingError> {
    let candidates = || {
        rules.iter().filter(|rule| {
            rule.tenant_id == query.tenant_id && rule.origin == query.origin && rule.is_selectable()
        })
    };

    let by_category = query.category_id.and_then(|category_id| {
        candidates()
            .filter(|rule| rule.category_id == Some(category_id))
            .min_by_key(|rule| rule.id)
            .map(|rule| (rule, MatchedBy::Category))
    });

    let selected = by_category.or_else(|| {
        let subtype = query.subtype.as_deref()?;
        candidates()
            .filter(|rule| rule.subtype.as_deref() == Some(subtype))
            .min_by_key(|rule| rule.id)
            .map(|rule| (rule, MatchedBy::Subtype))
    });

    let Some((rule, matched_by)) = selected else {
        return Err(no_active_rule(query));
    };

    to_match(rule, matched_by)
}

/// Converts a selected rule into a validated match.
///
/// # Errors
///
/// Returns `SameDebitCreditAccount` if the rule is self-referencing.
pub fn to_match(rule: &AccountingRule, matched_by: MatchedBy) -> Result<RuleMatch, PostingError> {
    let accounts = RuleAccounts::new(rule.debit_account_id, rule.credit_account_id)?;
    Ok(RuleMatch {
        rule_id: rule.id,
        accounts,
        matched_by,
    })
}

/// Builds the `NoActiveRule` error for a query.
#[must_use]
pub fn no_active_rule(query: &RuleQuery) -> PostingError {
    PostingError::NoActiveRule {
        origin: query.origin,
        category_id: query.category_id,
        subtype: query.subtype.clone(),
    }
}

/// Validates a rule before it is stored.
///
/// # Errors
///
/// Returns `MissingRuleKey` if the rule has neither a category nor a
/// non-blank subtype, and `SameDebitCreditAccount` if it is self-referencing.
pub fn validate_rule_definition(rule: &AccountingRule) -> Result<(), PostingError> {
    let has_subtype = rule.subtype.as_deref().is_some_and(|s| !s.trim().is_empty());
    if rule.category_id.is_none() && !has_subtype {
        return Err(PostingError::MissingRuleKey);
    }
    RuleAccounts::new(rule.debit_account_id, rule.credit_account_id)?;
    Ok(())
}
