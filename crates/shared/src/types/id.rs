//! Typed IDs for type-safe entity references.
//!
//! Rows are keyed by database-generated `BIGSERIAL` ids. Wrapping them keeps a
//! `TenantId` from being passed where a `FinancialEntryId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wraps a raw database id.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw database id.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }

            /// Database ids start at 1; anything else never names a row.
            #[must_use]
            pub const fn is_valid(self) -> bool {
                self.0 > 0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

typed_id!(TenantId, "Identifier of the tenant that owns a row.");
typed_id!(
    FinancialEntryId,
    "Identifier of a financial entry (`lancamentos_financeiros`)."
);
typed_id!(
    AccountingRuleId,
    "Identifier of an automatic posting rule (`regras_contabeis`)."
);
typed_id!(
    JournalEntryId,
    "Identifier of a journal entry header (`lancamentos_contabeis`)."
);
typed_id!(
    JournalLineId,
    "Identifier of a journal line (`lancamentos_contabeis_linhas`)."
);
typed_id!(
    LedgerAccountId,
    "Identifier of a chart of accounts entry (`plano_contas`)."
);
typed_id!(CategoryId, "Identifier of a financial category.");
typed_id!(
    EntityId,
    "Identifier of a counterparty (customer or supplier)."
);
typed_id!(
    FinancialAccountId,
    "Identifier of a bank or cash account the entry settles against."
);
