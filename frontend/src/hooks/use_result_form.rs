use std::cell::RefCell;
use std::rc::Rc;

use engine::{
    dispatch, AutoSaveConfig, AutoSaveError, ClearOutcome, CompletionOutcome, DrawEdit, FieldIssue, PreviewConfig,
    PreviewDocument, ResultForm, SlotId,
};
use gloo::events::EventListener;
use gloo::timers::future::TimeoutFuture;
use shared::PrizeTier;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::hydration;
use crate::services::logging::Logger;

const COMPONENT: &str = "result-form-hook";
const NOTICE_DISPLAY_MS: u32 = 3000;
const SUBMIT_CONFIRMATION: &str = "Are you sure you want to save these lottery results?";
const LEAVE_WARNING: &str = "You have unsaved changes. Are you sure you want to leave?";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn css_class(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Info => "info",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        }
    }
}

/// Session-level notification shown above the form
#[derive(Clone, PartialEq, Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Clone, PartialEq, Debug)]
pub struct TicketInput {
    pub tier: PrizeTier,
    pub entry: usize,
    pub slot: usize,
    pub value: String,
}

#[derive(Clone, PartialEq, Debug)]
pub struct FieldInput {
    pub tier: PrizeTier,
    pub entry: usize,
    pub value: String,
}

#[derive(Clone, PartialEq, Debug)]
pub struct BulkImportInput {
    pub tier: PrizeTier,
    pub amount: String,
    pub text: String,
}

#[derive(Clone)]
pub struct ResultFormState {
    /// Snapshot of the form taken at render time
    pub form: ResultForm,
    pub issues: Vec<FieldIssue>,
    pub preview: Option<PreviewDocument>,
    pub notice: Option<Notice>,
    pub submitting: bool,
}

pub struct UseResultFormResult {
    pub state: ResultFormState,
    pub actions: UseResultFormActions,
}

#[derive(Clone)]
pub struct UseResultFormActions {
    pub on_draw_edit: Callback<DrawEdit>,
    pub on_ticket_input: Callback<TicketInput>,
    pub on_ticket_blur: Callback<SlotId>,
    pub on_amount_input: Callback<FieldInput>,
    pub on_place_input: Callback<FieldInput>,
    pub on_add_entry: Callback<PrizeTier>,
    pub on_remove_entry: Callback<(PrizeTier, usize)>,
    pub on_clear_all: Callback<PrizeTier>,
    /// Returns whether the bulk input buffers should be cleared
    pub on_bulk_import: Callback<BulkImportInput, bool>,
    pub on_submit: Callback<()>,
    pub on_toggle_preview: Callback<()>,
    pub refresh_preview: Callback<()>,
    pub dismiss_notice: Callback<()>,
}

/// Handles shared by every action of the hook
#[derive(Clone)]
struct FormContext {
    form: Rc<RefCell<ResultForm>>,
    force_update: UseForceUpdateHandle,
    preview: UseStateHandle<Option<PreviewDocument>>,
    preview_generation: Rc<RefCell<u64>>,
    notice: UseStateHandle<Option<Notice>>,
    notice_generation: Rc<RefCell<u64>>,
    api_client: ApiClient,
    save_config: AutoSaveConfig,
    preview_config: PreviewConfig,
}

impl FormContext {
    fn notify(&self, kind: NoticeKind, text: impl Into<String>) {
        let generation = *self.notice_generation.borrow() + 1;
        *self.notice_generation.borrow_mut() = generation;
        self.notice.set(Some(Notice { kind, text: text.into() }));

        if kind == NoticeKind::Error {
            return;
        }
        let notice = self.notice.clone();
        let current = self.notice_generation.clone();
        spawn_local(async move {
            TimeoutFuture::new(NOTICE_DISPLAY_MS).await;
            if *current.borrow() == generation {
                notice.set(None);
            }
        });
    }

    fn refresh_preview(&self) {
        let document = self.form.borrow_mut().refresh_preview();
        if let Some(document) = document {
            self.preview.set(Some(document));
        }
    }

    /// Re-render now and refresh the preview once edits settle
    fn after_edit(&self) {
        self.force_update.force_update();

        let generation = *self.preview_generation.borrow() + 1;
        *self.preview_generation.borrow_mut() = generation;
        let context = self.clone();
        spawn_local(async move {
            TimeoutFuture::new(context.preview_config.debounce_ms).await;
            if *context.preview_generation.borrow() == generation {
                context.refresh_preview();
            }
        });
    }

    fn auto_save(&self, slot: SlotId) {
        let begun = self.form.borrow_mut().begin_auto_save(slot);
        let pending = match begun {
            Ok(Some(pending)) => pending,
            Ok(None) => return,
            Err(e) => {
                match skipped_save_notice(&e) {
                    Some(notice) => self.notify(notice.kind, notice.text),
                    None => Logger::debug_with_component(COMPONENT, &format!("Auto-save skipped: {}", e)),
                }
                return;
            }
        };
        self.force_update.force_update();

        let context = self.clone();
        spawn_local(async move {
            TimeoutFuture::new(context.save_config.settle_delay_ms).await;
            let result = dispatch(&context.api_client, &pending).await;
            if let Err(e) = &result {
                Logger::error_with_component(COMPONENT, &e.to_string());
                context.notify(NoticeKind::Error, e.to_string());
            }

            let outcome = context.form.borrow_mut().complete_auto_save(&pending, result);
            context.force_update.force_update();

            if let CompletionOutcome::Applied(status) = outcome {
                if let Some(delay) = context.save_config.clear_delay_ms(&status) {
                    TimeoutFuture::new(delay).await;
                    let cleared = context.form.borrow_mut().clear_status(pending.slot, pending.version);
                    if cleared {
                        context.force_update.force_update();
                    }
                }
            }
        });
    }
}

/// Warning shown when a blurred slot could not be auto-saved
fn skipped_save_notice(error: &AutoSaveError) -> Option<Notice> {
    match error {
        AutoSaveError::Precondition(e) => Some(Notice {
            kind: NoticeKind::Warning,
            text: e.to_string(),
        }),
        AutoSaveError::Validation(e) => Some(Notice {
            kind: NoticeKind::Warning,
            text: format!("{} The ticket was not saved.", e),
        }),
        AutoSaveError::UnknownSlot(_) => None,
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Moves keyboard focus to the input with the given DOM id
pub fn focus_field(element_id: &str) {
    let element = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(element_id))
        .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok());
    if let Some(element) = element {
        let _ = element.focus();
    }
}

#[hook]
pub fn use_result_form(api_client: &ApiClient) -> UseResultFormResult {
    let form = use_mut_ref(hydration::initial_form);
    let force_update = use_force_update();
    let preview = use_state(|| Option::<PreviewDocument>::None);
    let notice = use_state(|| Option::<Notice>::None);
    let submitting = use_state(|| false);
    let preview_generation = use_mut_ref(|| 0u64);
    let notice_generation = use_mut_ref(|| 0u64);

    let context = FormContext {
        form: form.clone(),
        force_update: force_update.clone(),
        preview: preview.clone(),
        preview_generation,
        notice: notice.clone(),
        notice_generation,
        api_client: api_client.clone(),
        save_config: AutoSaveConfig::default(),
        preview_config: PreviewConfig::default(),
    };

    // Load the result named in the URL when the page carried no seed data
    {
        let context = context.clone();
        use_effect_with((), move |_| {
            let pending_load = {
                let form = context.form.borrow();
                match form.session().mode {
                    engine::FormMode::Create => hydration::result_id_from_location(),
                    engine::FormMode::Edit => None,
                }
            };
            if let Some(result_id) = pending_load {
                spawn_local(async move {
                    match context.api_client.get_result(result_id).await {
                        Ok(result) => {
                            *context.form.borrow_mut() = ResultForm::edit(result.draw, result.prizes);
                            context.force_update.force_update();
                        }
                        Err(e) => {
                            Logger::error_with_component(COMPONENT, &e);
                            context.notify(NoticeKind::Error, e);
                        }
                    }
                });
            }
            || ()
        });
    }

    // Warn before leaving with unsaved changes
    {
        let form = form.clone();
        use_effect_with((), move |_| {
            let listener = web_sys::window().map(|window| {
                EventListener::new(&window, "beforeunload", move |event| {
                    if form.borrow().session().is_dirty() {
                        event.prevent_default();
                        if let Some(event) = event.dyn_ref::<web_sys::BeforeUnloadEvent>() {
                            event.set_return_value(LEAVE_WARNING);
                        }
                    }
                })
            });
            move || drop(listener)
        });
    }

    let on_draw_edit = {
        let context = context.clone();
        Callback::from(move |edit: DrawEdit| {
            let removed = context.form.borrow_mut().set_draw_field(edit);
            if removed > 0 {
                context.notify(NoticeKind::Info, "Spaces are not allowed in the draw number and were removed.");
            }
            context.after_edit();
        })
    };

    let on_ticket_input = {
        let context = context.clone();
        Callback::from(move |input: TicketInput| {
            let edit = context
                .form
                .borrow_mut()
                .set_ticket(input.tier, input.entry, input.slot, &input.value);
            match edit {
                Ok(edit) if edit.removed_whitespace > 0 => {
                    context.notify(
                        NoticeKind::Info,
                        format!("{}: spaces are not allowed in ticket numbers and were removed.", input.tier),
                    );
                }
                Ok(_) => {}
                Err(e) => Logger::warn_with_component(COMPONENT, &e.to_string()),
            }
            context.after_edit();
        })
    };

    let on_ticket_blur = {
        let context = context.clone();
        Callback::from(move |slot: SlotId| context.auto_save(slot))
    };

    let on_amount_input = {
        let context = context.clone();
        Callback::from(move |input: FieldInput| {
            let edit = context.form.borrow_mut().set_amount(input.tier, input.entry, &input.value);
            if let Err(e) = edit {
                context.notify(NoticeKind::Warning, e.to_string());
            }
            context.after_edit();
        })
    };

    let on_place_input = {
        let context = context.clone();
        Callback::from(move |input: FieldInput| {
            let edit = context.form.borrow_mut().set_place(input.tier, input.entry, &input.value);
            if let Err(e) = edit {
                Logger::warn_with_component(COMPONENT, &e.to_string());
            }
            context.after_edit();
        })
    };

    let on_add_entry = {
        let context = context.clone();
        Callback::from(move |tier: PrizeTier| {
            context.form.borrow_mut().add_entry(tier);
            context.after_edit();
        })
    };

    let on_remove_entry = {
        let context = context.clone();
        Callback::from(move |(tier, index): (PrizeTier, usize)| {
            let removed = context.form.borrow_mut().remove_entry(tier, index);
            if let Err(e) = removed {
                context.notify(NoticeKind::Warning, e.to_string());
            }
            context.after_edit();
        })
    };

    let on_clear_all = {
        let context = context.clone();
        Callback::from(move |tier: PrizeTier| {
            let outcome = context.form.borrow_mut().clear_all(tier, false);
            let outcome = match outcome {
                ClearOutcome::ConfirmationRequired
                    if confirm(&format!("Are you sure you want to clear all {} entries?", tier)) =>
                {
                    context.form.borrow_mut().clear_all(tier, true)
                }
                other => other,
            };
            match outcome {
                ClearOutcome::Cleared { .. } => {
                    context.notify(NoticeKind::Success, format!("{} entries cleared.", tier));
                    context.after_edit();
                }
                ClearOutcome::NothingToClear => {
                    context.notify(NoticeKind::Info, format!("{} has nothing to clear.", tier));
                }
                ClearOutcome::ConfirmationRequired => {}
            }
        })
    };

    let on_bulk_import = {
        let context = context.clone();
        Callback::from(move |input: BulkImportInput| -> bool {
            let result = context
                .form
                .borrow_mut()
                .bulk_import(input.tier, &input.amount, &input.text);
            match result {
                Ok(report) => {
                    let kind = if report.has_warnings() {
                        NoticeKind::Warning
                    } else {
                        NoticeKind::Success
                    };
                    context.notify(kind, report.summary());
                    context.after_edit();
                    report.should_clear_input()
                }
                Err(e) => {
                    context.notify(NoticeKind::Error, e.to_string());
                    focus_field(&e.field().element_id());
                    false
                }
            }
        })
    };

    let on_submit = {
        let context = context.clone();
        let submitting = submitting.clone();
        Callback::from(move |_| {
            if *submitting {
                return;
            }
            let submission = context.form.borrow().submit();
            let submission = match submission {
                Ok(submission) => submission,
                Err(e) => {
                    context.notify(NoticeKind::Error, e.to_string());
                    focus_field(&e.field.element_id());
                    return;
                }
            };
            if !confirm(SUBMIT_CONFIRMATION) {
                return;
            }

            submitting.set(true);
            let context = context.clone();
            let submitting = submitting.clone();
            spawn_local(async move {
                match context.api_client.submit_result(submission.fields()).await {
                    Ok(response) => {
                        Logger::info_with_component(COMPONENT, &format!("Saved result {}", response.result_id));
                        context.form.borrow_mut().submission_succeeded(response.result_id);
                        context.notify(NoticeKind::Success, response.message);
                        context.refresh_preview();
                    }
                    Err(e) => {
                        Logger::error_with_component(COMPONENT, &format!("Submission failed: {}", e));
                        context.notify(NoticeKind::Error, e);
                    }
                }
                submitting.set(false);
                context.force_update.force_update();
            });
        })
    };

    let on_toggle_preview = {
        let context = context.clone();
        Callback::from(move |_| {
            let toggled = context.form.borrow_mut().toggle_preview();
            match toggled {
                Ok(visible) => {
                    if visible {
                        context.refresh_preview();
                    }
                    context.force_update.force_update();
                    let context = context.clone();
                    spawn_local(async move {
                        TimeoutFuture::new(context.preview_config.toggle_lock_ms).await;
                        context.form.borrow_mut().finish_toggle();
                    });
                }
                Err(e) => Logger::debug_with_component(COMPONENT, &e.to_string()),
            }
        })
    };

    let refresh_preview = {
        let context = context.clone();
        Callback::from(move |_| context.refresh_preview())
    };

    let dismiss_notice = {
        let notice = notice.clone();
        Callback::from(move |_| notice.set(None))
    };

    let snapshot = form.borrow().clone();
    let issues = snapshot.live_issues();

    UseResultFormResult {
        state: ResultFormState {
            form: snapshot,
            issues,
            preview: (*preview).clone(),
            notice: (*notice).clone(),
            submitting: *submitting,
        },
        actions: UseResultFormActions {
            on_draw_edit,
            on_ticket_input,
            on_ticket_blur,
            on_amount_input,
            on_place_input,
            on_add_entry,
            on_remove_entry,
            on_clear_all,
            on_bulk_import,
            on_submit,
            on_toggle_preview,
            refresh_preview,
            dismiss_notice,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{PreconditionError, ValidationError};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_validation_skip_warns_with_tier() {
        let error = AutoSaveError::Validation(ValidationError::MissingAmount { tier: PrizeTier::Seventh });
        let notice = skipped_save_notice(&error).unwrap();
        assert_eq!(notice.kind, NoticeKind::Warning);
        assert!(notice.text.starts_with("7th Prize:"));
        assert!(notice.text.ends_with("The ticket was not saved."));
    }

    #[wasm_bindgen_test]
    fn test_precondition_skip_warns() {
        let error = AutoSaveError::Precondition(PreconditionError::DrawNotSaved { tier: PrizeTier::Fifth });
        assert_eq!(skipped_save_notice(&error).unwrap().kind, NoticeKind::Warning);
        assert_eq!(skipped_save_notice(&AutoSaveError::UnknownSlot(SlotId(3))), None);
    }
}
