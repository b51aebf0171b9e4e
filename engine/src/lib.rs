//! Lottery result entry engine.
//!
//! UI-agnostic core of the result entry page: the typed entry model, bulk
//! import, amount inheritance, validation, per-slot auto-save and the preview
//! projection, driven through the [`ResultForm`] controller.

pub mod amount_inheritance;
pub mod auto_save;
pub mod bulk_import;
pub mod entry_model;
pub mod errors;
pub mod form;
pub mod preview;
pub mod session;
pub mod submission;
pub mod validation;

pub use amount_inheritance::AmountEdit;
pub use auto_save::{dispatch, AutoSaveConfig, AutoSaveTransport, CompletionOutcome, PendingSave};
pub use bulk_import::{BulkImportParser, ImportFormat, ImportReport};
pub use entry_model::{ClearOutcome, EntryModel, FieldEdit, PrizeEntry, SlotId, SlotStatus, TicketSlot, TierEntries};
pub use errors::{
    AutoSaveError, BulkImportError, DrawField, EntryError, FieldRef, PersistenceError, PreconditionError,
    SubmissionError, ToggleError, ValidationError,
};
pub use form::{DrawEdit, ResultForm};
pub use preview::{
    format_inr, PreviewConfig, PreviewDocument, PreviewGate, PreviewHeader, PreviewProjection, PreviewSource,
    PrizeCard, TicketLayout, NO_DATA_MESSAGE,
};
pub use session::{FormMode, SessionState, ToggleState};
pub use submission::FormSubmission;
pub use validation::{FieldIssue, Validator};
