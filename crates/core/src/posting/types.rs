//! Posting domain types.
//!
//! Typed records for the rows the posting pipeline reads: financial entries
//! (the source facts) and accounting rules (the debit/credit mapping).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use partida_shared::types::{
    AccountingRuleId, CategoryId, EntityId, FinancialAccountId, FinancialEntryId,
    JournalEntryId, LedgerAccountId, TenantId,
};

use super::error::PostingError;

/// Kind of financial entry, which is also the origin key of an accounting rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OriginKind {
    /// Accounts payable.
    #[serde(rename = "conta_a_pagar")]
    ContaAPagar,
    /// Payment made against a payable.
    #[serde(rename = "pagamento_efetuado")]
    PagamentoEfetuado,
    /// Accounts receivable.
    #[serde(rename = "conta_a_receber")]
    ContaAReceber,
    /// Payment received against a receivable.
    #[serde(rename = "pagamento_recebido")]
    PagamentoRecebido,
}

impl OriginKind {
    /// Every supported kind.
    pub const ALL: [Self; 4] = [
        Self::ContaAPagar,
        Self::PagamentoEfetuado,
        Self::ContaAReceber,
        Self::PagamentoRecebido,
    ];

    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContaAPagar => "conta_a_pagar",
            Self::PagamentoEfetuado => "pagamento_efetuado",
            Self::ContaAReceber => "conta_a_receber",
            Self::PagamentoRecebido => "pagamento_recebido",
        }
    }

    /// Which side of the business the counterparty sits on.
    #[must_use]
    pub const fn counterparty_side(self) -> CounterpartySide {
        match self {
            Self::ContaAPagar | Self::PagamentoEfetuado => CounterpartySide::Supplier,
            Self::ContaAReceber | Self::PagamentoRecebido => CounterpartySide::Customer,
        }
    }
}

impl fmt::Display for OriginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OriginKind {
    type Err = PostingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| PostingError::UnknownKind(s.to_string()))
    }
}

/// Supplier or customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterpartySide {
    /// Stored as `fornecedor_id` on the journal header.
    Supplier,
    /// Stored as `cliente_id` on the journal header.
    Customer,
}

/// A counterparty reference resolved to its side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counterparty {
    /// A supplier (`fornecedor`).
    Supplier(EntityId),
    /// A customer (`cliente`).
    Customer(EntityId),
}

impl Counterparty {
    /// Builds the counterparty for an entry of `kind`.
    #[must_use]
    pub const fn for_kind(kind: OriginKind, entity_id: EntityId) -> Self {
        match kind.counterparty_side() {
            CounterpartySide::Supplier => Self::Supplier(entity_id),
            CounterpartySide::Customer => Self::Customer(entity_id),
        }
    }

    /// Supplier id, if this is a supplier.
    #[must_use]
    pub const fn supplier_id(self) -> Option<EntityId> {
        match self {
            Self::Supplier(id) => Some(id),
            Self::Customer(_) => None,
        }
    }

    /// Customer id, if this is a customer.
    #[must_use]
    pub const fn customer_id(self) -> Option<EntityId> {
        match self {
            Self::Customer(id) => Some(id),
            Self::Supplier(_) => None,
        }
    }
}

/// A financial fact that may be posted to the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialEntry {
    /// Row id.
    pub id: FinancialEntryId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Kind, used as the rule origin.
    pub kind: OriginKind,
    /// Customer or supplier, depending on `kind`.
    pub entity_id: Option<EntityId>,
    /// Financial category.
    pub category_id: Option<CategoryId>,
    /// Free-form subtype (e.g. `principal`).
    pub subtype: Option<String>,
    /// Absolute amount.
    pub amount: Decimal,
    /// Posting date.
    pub posting_date: NaiveDate,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Description, copied to the journal narrative.
    pub description: String,
    /// Bank or cash account.
    pub financial_account_id: Option<FinancialAccountId>,
    /// Business status (`pendente`, `pago`, ...).
    pub status: String,
}

impl FinancialEntry {
    /// The counterparty resolved to its side.
    #[must_use]
    pub fn counterparty(&self) -> Option<Counterparty> {
        self.entity_id
            .map(|entity_id| Counterparty::for_kind(self.kind, entity_id))
    }

    /// The rule lookup key for this entry.
    #[must_use]
    pub fn rule_query(&self) -> RuleQuery {
        RuleQuery {
            tenant_id: self.tenant_id,
            origin: self.kind,
            category_id: self.category_id,
            subtype: self.subtype.clone(),
        }
    }
}

/// An automatic posting rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountingRule {
    /// Row id; the lowest id wins among equal matches.
    pub id: AccountingRuleId,
    /// Owning tenant.
    pub tenant_id: TenantId,
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

impl AccountingRule {
    /// Returns true if the rule can be selected by the resolver.
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        self.active && self.automatic
    }
}

/// Lookup key for rule resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleQuery {
    /// Tenant to search in.
    pub tenant_id: TenantId,
    /// Entry kind.
    pub origin: OriginKind,
    /// Preferred match key.
    pub category_id: Option<CategoryId>,
    /// Fallback match key.
    pub subtype: Option<String>,
}

/// A validated debit/credit account pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleAccounts {
    debit: LedgerAccountId,
    credit: LedgerAccountId,
}

impl RuleAccounts {
    /// Pairs two accounts.
    ///
    /// # Errors
    ///
    /// Returns `SameDebitCreditAccount` if both sides name the same account.
    pub fn new(debit: LedgerAccountId, credit: LedgerAccountId) -> Result<Self, PostingError> {
        if debit == credit {
            return Err(PostingError::SameDebitCreditAccount(debit));
        }
        Ok(Self { debit, credit })
    }

    /// The account debited.
    #[must_use]
    pub const fn debit(&self) -> LedgerAccountId {
        self.debit
    }

    /// The account credited.
    #[must_use]
    pub const fn credit(&self) -> LedgerAccountId {
        self.credit
    }
}

/// Which lookup step selected a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedBy {
    /// Exact category match.
    Category,
    /// Subtype fallback.
    Subtype,
}

/// The outcome of a successful rule resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleMatch {
    /// Selected rule.
    pub rule_id: AccountingRuleId,
    /// Accounts to post to.
    pub accounts: RuleAccounts,
    /// Which lookup step matched.
    pub matched_by: MatchedBy,
}

/// Receipt of a posting attempt that ended with a journal entry in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PostingReceipt {
    /// The journal entry for the financial entry.
    pub journal_entry_id: JournalEntryId,
    /// True when the entry had been posted before this attempt.
    pub already_exists: bool,
}
