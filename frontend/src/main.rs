use shared::{LotteryOption, PrizeTier};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::draw_info_form::DrawInfoForm;
use components::notifications::Notifications;
use components::preview_panel::PreviewPanel;
use components::tier_section::TierSection;
use hooks::use_preview_refresh::use_preview_refresh;
use hooks::use_result_form::use_result_form;
use services::api::ApiClient;
use services::logging::Logger;

#[function_component(App)]
fn app() -> Html {
    let api_client = use_memo((), |_| ApiClient::new());
    let lotteries = use_state(Vec::<LotteryOption>::new);

    // Load the lottery dropdown once
    {
        let api_client = (*api_client).clone();
        let lotteries = lotteries.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match api_client.get_lotteries().await {
                    Ok(data) => lotteries.set(data),
                    Err(e) => Logger::error_with_component("app", &e),
                }
            });
            || ()
        });
    }

    let result_form = use_result_form(&api_client);
    let state = result_form.state;
    let actions = result_form.actions;

    let preview_visible = state.form.session().preview_visible();
    use_preview_refresh(
        engine::PreviewConfig::default(),
        actions.refresh_preview.clone(),
        preview_visible,
    );

    let on_submit = {
        let on_submit = actions.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(());
        })
    };

    let tier_sections = PrizeTier::DISPLAY_ORDER.iter().map(|tier| {
        let issues = state
            .issues
            .iter()
            .filter(|issue| issue.field.tier() == Some(*tier))
            .cloned()
            .collect::<Vec<_>>();
        html! {
            <TierSection
                key={tier.key()}
                entries={state.form.model().tier(*tier).clone()}
                {issues}
                on_ticket_input={actions.on_ticket_input.clone()}
                on_ticket_blur={actions.on_ticket_blur.clone()}
                on_amount_input={actions.on_amount_input.clone()}
                on_place_input={actions.on_place_input.clone()}
                on_add_entry={actions.on_add_entry.clone()}
                on_remove_entry={actions.on_remove_entry.clone()}
                on_clear_all={actions.on_clear_all.clone()}
                on_bulk_import={actions.on_bulk_import.clone()}
            />
        }
    });

    let title = match state.form.draw().result_id {
        Some(_) => "Edit Lottery Result",
        None => "Add Lottery Result",
    };

    html! {
        <div class="app">
            <header class="app-header">
                <h1>{title}</h1>
            </header>

            <Notifications notice={state.notice.clone()} on_dismiss={actions.dismiss_notice.clone()} />

            <main class="result-layout">
                <form id="lotteryForm" class="result-form" onsubmit={on_submit}>
                    <DrawInfoForm
                        draw={state.form.draw().clone()}
                        lotteries={(*lotteries).clone()}
                        on_edit={actions.on_draw_edit.clone()}
                    />

                    {for tier_sections}

                    <div class="fixed-bottom-buttons">
                        <button type="submit" class="btn btn-primary" disabled={state.submitting}>
                            {if state.submitting { "Saving..." } else { "Save result" }}
                        </button>
                    </div>
                </form>

                <PreviewPanel
                    document={state.preview.clone()}
                    visible={preview_visible}
                    on_toggle={actions.on_toggle_preview.clone()}
                />
            </main>
        </div>
    }
}

fn main() {
    services::logging::init_engine_logging();
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use engine::{AutoSaveConfig, PreviewConfig};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_timing_defaults() {
        let save = AutoSaveConfig::default();
        assert_eq!(save.settle_delay_ms, 100);
        assert_eq!(save.saved_clear_ms, 3000);
        assert_eq!(save.failed_clear_ms, 5000);

        let preview = PreviewConfig::default();
        assert_eq!(preview.refresh_interval_ms, 2000);
        assert_eq!(preview.debounce_ms, 300);
        assert_eq!(preview.toggle_lock_ms, 600);
    }
}
