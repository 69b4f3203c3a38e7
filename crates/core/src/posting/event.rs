//! Posting events and delivery outcomes.
//!
//! Event infrastructure delivers at least once. A delivery ends in exactly
//! one [`DeliveryOutcome`]; only infrastructure faults escape as errors, so
//! that the sender retries them and nothing else.

use serde::{Deserialize, Serialize};
use partida_shared::types::{FinancialEntryId, JournalEntryId, TenantId};

use super::error::PostingError;
use super::types::PostingReceipt;

/// Event emitted when a financial entry is recorded.
pub const FINANCIAL_ENTRY_CREATED: &str = "financial_entry_created";

/// Raw event as delivered by the event infrastructure.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    /// Event name.
    #[serde(alias = "name", alias = "eventType")]
    pub event_type: String,
    /// Delivery id assigned by the sender.
    #[serde(default)]
    pub id: Option<String>,
    /// Event payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Payload of [`FINANCIAL_ENTRY_CREATED`].
///
/// Only the ids are read; the fact itself is always reloaded from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FinancialEntryCreated {
    /// Source financial entry.
    #[serde(alias = "financialEntryId", alias = "lancamento_financeiro_id")]
    pub financial_entry_id: FinancialEntryId,
    /// Tenant the sender claims the entry belongs to.
    #[serde(alias = "tenantId")]
    pub tenant_id: TenantId,
}

/// A decoded event the posting pipeline handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingEvent {
    /// A financial entry was created and should be posted.
    FinancialEntryCreated(FinancialEntryCreated),
}

impl TryFrom<EventEnvelope> for PostingEvent {
    type Error = PostingError;

    fn try_from(envelope: EventEnvelope) -> Result<Self, Self::Error> {
        match envelope.event_type.as_str() {
            FINANCIAL_ENTRY_CREATED => {
                let payload: FinancialEntryCreated = serde_json::from_value(envelope.data)
                    .map_err(|e| PostingError::InvalidEvent(e.to_string()))?;
                Ok(Self::FinancialEntryCreated(payload))
            }
            other => Err(PostingError::UnknownEvent(other.to_string())),
        }
    }
}

/// Why a delivery was acknowledged without posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The fact does not exist for the tenant.
    NotFound,
    /// The fact already has a journal entry.
    AlreadyPosted,
}

/// Why a delivery failed permanently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No active automatic rule matched.
    NoRule,
    /// The fact or the rule failed validation.
    Invalid,
}

/// Terminal state of a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// A new journal entry was written.
    Posted {
        /// The new journal entry.
        journal_entry_id: JournalEntryId,
    },
    /// Nothing to do.
    Skipped {
        /// Why.
        reason: SkipReason,
        /// Existing journal entry, when already posted.
        #[serde(skip_serializing_if = "Option::is_none")]
        journal_entry_id: Option<JournalEntryId>,
    },
    /// Permanent failure; redelivery will not help.
    Failed {
        /// Why.
        reason: FailureReason,
        /// Error message.
        message: String,
    },
}

impl DeliveryOutcome {
    /// HTTP status the sender receives.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Posted { .. } | Self::Skipped { .. } => 200,
            Self::Failed { .. } => 422,
        }
    }

    /// Short label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Posted { .. } => "posted",
            Self::Skipped { reason: SkipReason::NotFound, .. } => "skipped_not_found",
            Self::Skipped { reason: SkipReason::AlreadyPosted, .. } => "skipped_already_posted",
            Self::Failed { reason: FailureReason::NoRule, .. } => "failed_no_rule",
            Self::Failed { reason: FailureReason::Invalid, .. } => "failed_invalid",
        }
    }
}

/// Maps the result of a posting attempt onto a delivery outcome.
///
/// # Errors
///
/// Database and internal errors are returned unchanged so the delivery is
/// retried.
pub fn classify(result: Result<PostingReceipt, PostingError>) -> Result<DeliveryOutcome, PostingError> {
    match result {
        Ok(receipt) if receipt.already_exists => Ok(DeliveryOutcome::Skipped {
            reason: SkipReason::AlreadyPosted,
            journal_entry_id: Some(receipt.journal_entry_id),
        }),
        Ok(receipt) => Ok(DeliveryOutcome::Posted {
            journal_entry_id: receipt.journal_entry_id,
        }),
        Err(PostingError::FinancialEntryNotFound(_)) => Ok(DeliveryOutcome::Skipped {
            reason: SkipReason::NotFound,
            journal_entry_id: None,
        }),
        Err(err @ PostingError::NoActiveRule { .. }) => Ok(DeliveryOutcome::Failed {
            reason: FailureReason::NoRule,
            message: err.to_string(),
        }),
        Err(err) if err.is_validation() => Ok(DeliveryOutcome::Failed {
            reason: FailureReason::Invalid,
            message: err.to_string(),
        }),
        Err(err) => Err(err),
    }
}
