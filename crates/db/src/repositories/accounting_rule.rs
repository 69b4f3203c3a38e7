//! Accounting rule repository and resolver.
//!
//! Resolution issues two ordered lookups: an exact category match, then a
//! subtype match, each taking the lowest rule id. Only active automatic rules
//! of the requested tenant and origin are considered.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use serde::Serialize;
use partida_core::posting::{
    AccountingRule, MatchedBy, OriginKind, PostingError, RuleMatch, RuleQuery, no_active_rule,
    to_match, validate_rule_definition,
};
use partida_shared::types::{AccountingRuleId, CategoryId, LedgerAccountId, TenantId};

use crate::entities::{plano_contas, regras_contabeis};
use crate::error::AccountingError;

/// Input for creating an accounting rule.
#[derive(Debug, Clone)]
pub struct CreateAccountingRuleInput {
    /// Entry kind the rule applies to.
    pub origin: OriginKind,
    /// Category match key.
    pub category_id: Option<CategoryId>,
    /// Subtype match key.
    pub subtype: Option<String>,
    /// Account debited.
    pub debit_account_id: LedgerAccountId,
    /// Account credited.
    pub credit_account_id: LedgerAccountId,
    /// Description.
    pub description: Option<String>,
    /// Whether the rule fires automatically.
    pub automatic: bool,
    /// Whether the rule is enabled.
    pub active: bool,
}

/// A resolved rule with its accounts joined from the chart of accounts.
#[derive(Debug, Clone, Serialize)]
pub struct RuleLookup {
    /// The selected rule.
    pub rule: regras_contabeis::Model,
    /// Which lookup step matched.
    pub matched_by: MatchedBy,
    /// Debit account, if present in the chart of accounts.
    pub debit_account: Option<plano_contas::Model>,
    /// Credit account, if present in the chart of accounts.
    pub credit_account: Option<plano_contas::Model>,
}

/// Repository for `regras_contabeis`.
#[derive(Debug, Clone)]
pub struct AccountingRuleRepository {
    db: DatabaseConnection,
}

impl AccountingRuleRepository {
    /// Creates a new accounting rule repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a rule after validating its keys and accounts.
    ///
    /// # Errors
    ///
    /// Returns `MissingRuleKey` or `SameDebitCreditAccount` for invalid
    /// rules, or a database error.
    pub async fn create(
        &self,
        tenant_id: TenantId,
        input: CreateAccountingRuleInput,
    ) -> Result<regras_contabeis::Model, AccountingError> {
        let subtype = input
            .subtype
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let rule = AccountingRule {
            id: AccountingRuleId::new(0),
            tenant_id,
            origin: input.origin,
            category_id: input.category_id,
            subtype,
            debit_account_id: input.debit_account_id,
            credit_account_id: input.credit_account_id,
            description: input.description,
            automatic: input.automatic,
            active: input.active,
        };
        validate_rule_definition(&rule)?;

        let model = regras_contabeis::ActiveModel {
            tenant_id: Set(tenant_id.get()),
            origem: Set(rule.origin.as_str().to_string()),
            categoria_financeira_id: Set(rule.category_id.map(CategoryId::get)),
            subtipo: Set(rule.subtype),
            conta_debito_id: Set(rule.debit_account_id.get()),
            conta_credito_id: Set(rule.credit_account_id.get()),
            descricao: Set(rule.description),
            automatico: Set(rule.automatic),
            ativo: Set(rule.active),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!(
            tenant_id = %tenant_id,
            rule_id = model.id,
            origin = %input.origin,
            "Accounting rule created"
        );

        Ok(model)
    }

    /// Lists a tenant's rules ordered by origin, then id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        tenant_id: TenantId,
        origin: Option<OriginKind>,
    ) -> Result<Vec<regras_contabeis::Model>, AccountingError> {
        let mut query = regras_contabeis::Entity::find()
            .filter(regras_contabeis::Column::TenantId.eq(tenant_id.get()));

        if let Some(origin) = origin {
            query = query.filter(regras_contabeis::Column::Origem.eq(origin.as_str()));
        }

        let rules = query
            .order_by_asc(regras_contabeis::Column::Origem)
            .order_by_asc(regras_contabeis::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rules)
    }

    /// Resolves the debit and credit accounts for `query`.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveRule` when nothing matches, `SameDebitCreditAccount`
    /// for a self-referencing rule, or a database error.
    pub async fn resolve_rule(&self, query: &RuleQuery) -> Result<RuleMatch, AccountingError> {
        let (_, matched) = resolve_on(&self.db, query).await?;
        Ok(matched)
    }

    /// Resolves a rule and joins its accounts from the chart of accounts.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resolve_rule`].
    pub async fn lookup(&self, query: &RuleQuery) -> Result<RuleLookup, AccountingError> {
        let (rule, matched) = resolve_on(&self.db, query).await?;

        let accounts = plano_contas::Entity::find()
            .filter(plano_contas::Column::TenantId.eq(query.tenant_id.get()))
            .filter(plano_contas::Column::Id.is_in([
                matched.accounts.debit().get(),
                matched.accounts.credit().get(),
            ]))
            .all(&self.db)
            .await?;

        let find = |id: LedgerAccountId| accounts.iter().find(|a| a.id == id.get()).cloned();

        Ok(RuleLookup {
            debit_account: find(matched.accounts.debit()),
            credit_account: find(matched.accounts.credit()),
            matched_by: matched.matched_by,
            rule,
        })
    }
}

/// Resolves a rule on any connection, including an open transaction.
pub(crate) async fn resolve_on<C: ConnectionTrait>(
    conn: &C,
    query: &RuleQuery,
) -> Result<(regras_contabeis::Model, RuleMatch), AccountingError> {
    if let Some(category_id) = query.category_id {
        let found = candidates(query)
            .filter(regras_contabeis::Column::CategoriaFinanceiraId.eq(category_id.get()))
            .one(conn)
            .await?;
        if let Some(model) = found {
            return Ok(matched(model, MatchedBy::Category)?);
        }
    }

    if let Some(subtype) = query.subtype.as_deref() {
        let found = candidates(query)
            .filter(regras_contabeis::Column::Subtipo.eq(subtype))
            .one(conn)
            .await?;
        if let Some(model) = found {
            return Ok(matched(model, MatchedBy::Subtype)?);
        }
    }

    Err(no_active_rule(query).into())
}

fn candidates(query: &RuleQuery) -> Select<regras_contabeis::Entity> {
    regras_contabeis::Entity::find()
        .filter(regras_contabeis::Column::TenantId.eq(query.tenant_id.get()))
        .filter(regras_contabeis::Column::Origem.eq(query.origin.as_str()))
        .filter(regras_contabeis::Column::Ativo.eq(true))
        .filter(regras_contabeis::Column::Automatico.eq(true))
        .order_by_asc(regras_contabeis::Column::Id)
}

fn matched(
    model: regras_contabeis::Model,
    matched_by: MatchedBy,
) -> Result<(regras_contabeis::Model, RuleMatch), PostingError> {
    let rule = to_domain(&model)?;
    let matched = to_match(&rule, matched_by)?;
    Ok((model, matched))
}

/// Maps a stored rule to the domain type.
///
/// # Errors
///
/// Returns `UnknownKind` if the stored origin is not a known kind.
pub fn to_domain(model: &regras_contabeis::Model) -> Result<AccountingRule, PostingError> {
    Ok(AccountingRule {
        id: AccountingRuleId::new(model.id),
        tenant_id: TenantId::new(model.tenant_id),
        origin: model.origem.parse()?,
        category_id: model.categoria_financeira_id.map(CategoryId::new),
        subtype: model.subtipo.clone(),
        debit_account_id: LedgerAccountId::new(model.conta_debito_id),
        credit_account_id: LedgerAccountId::new(model.conta_credito_id),
        description: model.descricao.clone(),
        automatic: model.automatico,
        active: model.ativo,
    })
}
