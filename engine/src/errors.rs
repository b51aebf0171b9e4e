//! Error taxonomy of the entry engine.
//!
//! - [`ValidationError`]: blocking, field-scoped rule violations
//! - [`EntryError`]: structural edits the model refuses
//! - [`BulkImportError`]: the all-or-nothing failures of a bulk import
//! - [`PreconditionError`] / [`PersistenceError`]: auto-save failures
//! - [`SubmissionError`]: a [`ValidationError`] pinned to the first offending field
//! - [`ToggleError`]: a preview toggle refused while another one runs
//!
//! Aggregate, non-blocking import warnings are reported through
//! [`crate::bulk_import::ImportReport`] rather than as errors.

use shared::PrizeTier;
use std::fmt;

use crate::entry_model::SlotId;

/// Draw-level fields that are required on submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawField {
    Lottery,
    DrawNumber,
    Date,
}

impl DrawField {
    pub fn label(self) -> &'static str {
        match self {
            DrawField::Lottery => "Lottery",
            DrawField::DrawNumber => "Draw number",
            DrawField::Date => "Date",
        }
    }
}

/// Reference to a single input of the result form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef {
    Draw(DrawField),
    Amount { tier: PrizeTier, entry: usize },
    Ticket { tier: PrizeTier, entry: usize, slot: usize },
    Place { tier: PrizeTier, entry: usize },
    BulkAmount(PrizeTier),
    BulkText(PrizeTier),
}

impl FieldRef {
    /// DOM id of the input this reference points at, used to move focus
    pub fn element_id(&self) -> String {
        match self {
            FieldRef::Draw(DrawField::Lottery) => "lottery".to_string(),
            FieldRef::Draw(DrawField::DrawNumber) => "draw_number".to_string(),
            FieldRef::Draw(DrawField::Date) => "date".to_string(),
            FieldRef::Amount { tier, entry } => format!("{}-amount-{}", tier.key(), entry),
            FieldRef::Ticket { tier, entry, slot } => {
                format!("{}-ticket-{}-{}", tier.key(), entry, slot)
            }
            FieldRef::Place { tier, entry } => format!("{}-place-{}", tier.key(), entry),
            FieldRef::BulkAmount(tier) => format!("{}-bulk-amount", tier.key()),
            FieldRef::BulkText(tier) => format!("{}-bulk-textarea", tier.key()),
        }
    }

    pub fn tier(&self) -> Option<PrizeTier> {
        match self {
            FieldRef::Draw(_) => None,
            FieldRef::Amount { tier, .. }
            | FieldRef::Ticket { tier, .. }
            | FieldRef::Place { tier, .. }
            | FieldRef::BulkAmount(tier)
            | FieldRef::BulkText(tier) => Some(*tier),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{tier}: {entered} digits entered, {missing} more required")]
    TooFewDigits {
        tier: PrizeTier,
        entered: usize,
        missing: usize,
    },
    #[error("{tier}: {entered} digits entered, {excess} must be removed")]
    TooManyDigits {
        tier: PrizeTier,
        entered: usize,
        excess: usize,
    },
    #[error("{tier}: ticket number \"{value}\" must contain digits only")]
    NonNumericTicket { tier: PrizeTier, value: String },
    #[error("{tier}: a prize amount is required for the entered ticket numbers")]
    MissingAmount { tier: PrizeTier },
    #[error("{tier}: prize amount \"{value}\" must be a non-zero number")]
    InvalidAmount { tier: PrizeTier, value: String },
    #[error("{tier}: spaces are not allowed in ticket numbers or places")]
    ContainsWhitespace { tier: PrizeTier },
    #[error("Please fill in all required fields in the Lottery Draw Information section ({0})")]
    MissingDrawField(DrawField),
    #[error("Please add at least one prize entry.")]
    NoEntries,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EntryError {
    #[error("{tier}: entry {index} does not exist")]
    UnknownEntry { tier: PrizeTier, index: usize },
    #[error("{tier}: ticket slot {slot} of entry {entry} does not exist")]
    UnknownSlot {
        tier: PrizeTier,
        entry: usize,
        slot: usize,
    },
    #[error("{tier}: the first entry cannot be removed, clear it instead")]
    CannotRemoveFirstEntry { tier: PrizeTier },
    #[error("{tier}: entry {entry} shows the shared prize amount; edit the first entry's amount instead")]
    ReadOnlyAmount { tier: PrizeTier, entry: usize },
    #[error("{tier}: places are only recorded for 1st, 2nd and 3rd prizes")]
    PlaceNotSupported { tier: PrizeTier },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BulkImportError {
    #[error("{tier}: please enter a prize amount in the amount field before importing ticket numbers")]
    MissingAmount { tier: PrizeTier },
    #[error("{tier}: prize amount \"{value}\" must be a non-zero number")]
    InvalidAmount { tier: PrizeTier, value: String },
    #[error("{tier}: no entries found in the bulk entry text")]
    EmptyInput { tier: PrizeTier },
}

impl BulkImportError {
    /// The field the user should be sent to
    pub fn field(&self) -> FieldRef {
        match self {
            BulkImportError::MissingAmount { tier } | BulkImportError::InvalidAmount { tier, .. } => {
                FieldRef::BulkAmount(*tier)
            }
            BulkImportError::EmptyInput { tier } => FieldRef::BulkText(*tier),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PreconditionError {
    #[error("{tier}: save the lottery result once before ticket numbers can be auto-saved")]
    DrawNotSaved { tier: PrizeTier },
    #[error("{tier}: auto-save is only available for grouped prize tiers")]
    NotGroupedTier { tier: PrizeTier },
}

/// Network or server failure of a single auto-save call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{tier}: auto-save failed: {message}")]
pub struct PersistenceError {
    pub tier: PrizeTier,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AutoSaveError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("ticket slot {0} no longer exists")]
    UnknownSlot(SlotId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToggleError {
    #[error("the preview is already being toggled")]
    InProgress,
}

/// Blocking submission failure and the field that should receive focus
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct SubmissionError {
    pub field: FieldRef,
    pub error: ValidationError,
}

impl fmt::Display for DrawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element_id())
    }
}
