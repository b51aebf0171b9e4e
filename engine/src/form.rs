//! # ResultForm
//!
//! Controller for one result entry page. It owns the draw information, the
//! [`EntryModel`] and the [`SessionState`], and is the only entry point the
//! UI layer uses to change them.
//!
//! ## Key Responsibilities
//! - Route every edit to the model and flag the session dirty
//! - Run the blocking submission checks and build the form payload
//! - Drive the auto-save lifecycle of grouped-tier slots
//! - Produce preview documents while the preview is visible

use log::info;
use shared::{strip_whitespace, AutoSaveResponse, Draw, PrizeEntriesData, PrizeTier};

use crate::amount_inheritance::AmountEdit;
use crate::auto_save::{CompletionOutcome, PendingSave};
use crate::bulk_import::ImportReport;
use crate::entry_model::{ClearOutcome, EntryModel, FieldEdit, PrizeEntry, SlotId};
use crate::errors::{AutoSaveError, BulkImportError, EntryError, PersistenceError, SubmissionError, ToggleError};
use crate::preview::{PreviewDocument, PreviewProjection};
use crate::session::{FormMode, SessionState};
use crate::submission::FormSubmission;
use crate::validation::{FieldIssue, Validator};

/// A change to the draw information section
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEdit {
    Lottery { id: String, name: String },
    DrawNumber(String),
    Date(String),
    Published(bool),
    Bumper(bool),
    NotifyOnSave(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultForm {
    draw: Draw,
    model: EntryModel,
    session: SessionState,
    hydrated: Option<PrizeEntriesData>,
}

impl Default for ResultForm {
    fn default() -> Self {
        Self::create()
    }
}

impl ResultForm {
    /// Blank form for a new result
    pub fn create() -> Self {
        Self {
            draw: Draw::default(),
            model: EntryModel::new(),
            session: SessionState::new(FormMode::Create),
            hydrated: None,
        }
    }

    /// Form seeded from a persisted result
    pub fn edit(draw: Draw, prizes: PrizeEntriesData) -> Self {
        info!(
            "Opening result {:?} for editing ({} tiers with rows)",
            draw.result_id,
            prizes.values().filter(|rows| !rows.is_empty()).count()
        );
        Self {
            model: EntryModel::hydrate(&prizes),
            draw,
            session: SessionState::new(FormMode::Edit),
            hydrated: Some(prizes),
        }
    }

    pub fn draw(&self) -> &Draw {
        &self.draw
    }

    pub fn model(&self) -> &EntryModel {
        &self.model
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Applies a draw edit. Returns how many whitespace characters were
    /// stripped from a draw number.
    pub fn set_draw_field(&mut self, edit: DrawEdit) -> usize {
        let mut removed = 0;
        match edit {
            DrawEdit::Lottery { id, name } => {
                self.draw.lottery = id;
                self.draw.lottery_name = name;
            }
            DrawEdit::DrawNumber(raw) => {
                let (value, stripped) = strip_whitespace(&raw);
                self.draw.draw_number = value;
                removed = stripped;
            }
            DrawEdit::Date(date) => self.draw.date = date,
            DrawEdit::Published(checked) => self.draw.is_published = checked,
            DrawEdit::Bumper(checked) => self.draw.is_bumper = checked,
            DrawEdit::NotifyOnSave(checked) => self.draw.notify_on_save = checked,
        }
        self.session.mark_dirty();
        removed
    }

    pub fn add_entry(&mut self, tier: PrizeTier) -> usize {
        self.session.mark_dirty();
        self.model.add_entry(tier)
    }

    pub fn remove_entry(&mut self, tier: PrizeTier, index: usize) -> Result<PrizeEntry, EntryError> {
        let removed = self.model.remove_entry(tier, index)?;
        self.session.mark_dirty();
        Ok(removed)
    }

    pub fn clear_all(&mut self, tier: PrizeTier, confirmed: bool) -> ClearOutcome {
        let outcome = self.model.clear_all(tier, confirmed);
        if let ClearOutcome::Cleared { .. } = outcome {
            self.session.mark_dirty();
        }
        outcome
    }

    pub fn set_ticket(&mut self, tier: PrizeTier, entry: usize, slot: usize, raw: &str) -> Result<FieldEdit, EntryError> {
        let edit = self.model.set_ticket(tier, entry, slot, raw)?;
        if edit.changed {
            self.session.mark_dirty();
        }
        Ok(edit)
    }

    pub fn set_amount(&mut self, tier: PrizeTier, entry: usize, raw: &str) -> Result<AmountEdit, EntryError> {
        let edit = self.model.set_amount(tier, entry, raw)?;
        self.session.mark_dirty();
        Ok(edit)
    }

    pub fn set_place(&mut self, tier: PrizeTier, entry: usize, raw: &str) -> Result<FieldEdit, EntryError> {
        let edit = self.model.set_place(tier, entry, raw)?;
        if edit.changed {
            self.session.mark_dirty();
        }
        Ok(edit)
    }

    pub fn bulk_import(&mut self, tier: PrizeTier, amount: &str, text: &str) -> Result<ImportReport, BulkImportError> {
        let report = self.model.bulk_import(tier, amount, text)?;
        if report.imported > 0 {
            self.session.mark_dirty();
        }
        Ok(report)
    }

    /// Non-blocking issues to show next to their fields
    pub fn live_issues(&self) -> Vec<FieldIssue> {
        Validator::live_issues(&self.model)
    }

    /// Validates the whole form and builds the payload to post
    pub fn submit(&self) -> Result<FormSubmission, SubmissionError> {
        Validator::validate_submission(&self.draw, &self.model)?;
        Ok(FormSubmission::build(&self.draw, &self.model))
    }

    /// Records a successful submission; the form continues in edit mode
    pub fn submission_succeeded(&mut self, result_id: i64) {
        info!("Result {} saved", result_id);
        self.draw.result_id = Some(result_id);
        self.session.mode = FormMode::Edit;
        self.session.mark_clean();
        // the live model is now what the server holds
        self.model.confirm_all();
        self.hydrated = None;
    }

    pub fn begin_auto_save(&mut self, slot: SlotId) -> Result<Option<PendingSave>, AutoSaveError> {
        self.model.begin_auto_save(&self.draw, slot)
    }

    pub fn complete_auto_save(
        &mut self,
        pending: &PendingSave,
        result: Result<AutoSaveResponse, PersistenceError>,
    ) -> CompletionOutcome {
        self.model.complete_auto_save(pending, result)
    }

    pub fn clear_status(&mut self, slot: SlotId, version: u64) -> bool {
        self.model.clear_status(slot, version)
    }

    /// The preview document, regardless of visibility
    pub fn preview(&self) -> PreviewDocument {
        PreviewProjection::project(&self.draw, &self.model, self.hydrated.as_ref())
    }

    /// A document to render, or `None` when hidden or unchanged since the last render
    pub fn refresh_preview(&mut self) -> Option<PreviewDocument> {
        if !self.session.preview_visible() {
            return None;
        }
        let document = self.preview();
        self.session.gate.should_render(&document).then_some(document)
    }

    /// Starts a visibility toggle; the caller releases it with [`Self::finish_toggle`]
    pub fn toggle_preview(&mut self) -> Result<bool, ToggleError> {
        self.session.begin_toggle()
    }

    pub fn finish_toggle(&mut self) {
        self.session.finish_toggle();
    }
}
