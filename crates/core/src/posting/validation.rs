//! Business rule validation for journal drafts.

use rust_decimal::Decimal;

use super::error::PostingError;
use super::journal::{EntrySide, JournalLineDraft, JournalTotals};

/// Decimal places stored by the ledger columns.
pub const AMOUNT_SCALE: u32 = 2;

/// Amounts must stay below 10^13 to fit `NUMERIC(15, 2)`.
const AMOUNT_LIMIT: Decimal = Decimal::from_parts(1_316_134_912, 2_328, 0, false, 0);

/// Validates a posting amount.
///
/// The amount must be positive, carry at most [`AMOUNT_SCALE`] significant
/// decimal places and fit the ledger columns.
///
/// # Errors
///
/// Returns `ZeroAmount`, `NegativeAmount`, `InvalidAmountPrecision` or
/// `AmountOutOfRange`.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, PostingError> {
    let amount = amount.normalize();
    if amount.is_zero() {
        return Err(PostingError::ZeroAmount);
    }
    if amount.is_sign_negative() {
        return Err(PostingError::NegativeAmount(amount));
    }
    if amount.scale() > AMOUNT_SCALE {
        return Err(PostingError::InvalidAmountPrecision {
            amount,
            max: AMOUNT_SCALE,
        });
    }
    if amount >= AMOUNT_LIMIT {
        return Err(PostingError::AmountOutOfRange(amount));
    }
    Ok(amount)
}

/// Validates that a set of journal lines is balanced.
///
/// Every line must move exactly one side by a positive amount, both sides
/// must be present, and the column sums must be equal.
///
/// # Errors
///
/// Returns an error if the lines are not balanced or violate business rules.
pub fn validate_lines(lines: &[JournalLineDraft]) -> Result<JournalTotals, PostingError> {
    if lines.len() < 2 {
        return Err(PostingError::InsufficientLines);
    }

    let mut debit = Decimal::ZERO;
    let mut credit = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for line in lines {
        if line.debit.is_sign_negative() || line.credit.is_sign_negative() {
            return Err(PostingError::InvalidLine);
        }
        match line.side() {
            Some(EntrySide::Debit) => {
                debit += line.debit;
                has_debit = true;
            }
            Some(EntrySide::Credit) => {
                credit += line.credit;
                has_credit = true;
            }
            None => return Err(PostingError::InvalidLine),
        }
    }

    if !has_debit || !has_credit {
        return Err(PostingError::InsufficientLines);
    }

    let totals = JournalTotals { debit, credit };
    if !totals.is_balanced() {
        return Err(PostingError::UnbalancedJournal { debit, credit });
    }

    Ok(totals)
}
