use engine::FieldRef;
use shared::PrizeTier;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::hooks::use_result_form::BulkImportInput;

#[derive(Properties, PartialEq)]
pub struct BulkEntryPanelProps {
    pub tier: PrizeTier,
    /// Returns whether the panel should clear its inputs
    pub on_import: Callback<BulkImportInput, bool>,
}

#[function_component(BulkEntryPanel)]
pub fn bulk_entry_panel(props: &BulkEntryPanelProps) -> Html {
    let amount = use_state(String::new);
    let text = use_state(String::new);
    let expanded = use_state(|| false);
    let tier = props.tier;

    let on_toggle = {
        let expanded = expanded.clone();
        Callback::from(move |_: MouseEvent| expanded.set(!*expanded))
    };

    let on_amount_input = {
        let amount = amount.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            amount.set(input.value());
        })
    };

    let on_text_input = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            text.set(input.value());
        })
    };

    let on_import = {
        let on_import = props.on_import.clone();
        let amount = amount.clone();
        let text = text.clone();
        Callback::from(move |_: MouseEvent| {
            let clear = on_import.emit(BulkImportInput {
                tier,
                amount: (*amount).clone(),
                text: (*text).clone(),
            });
            if clear {
                amount.set(String::new());
                text.set(String::new());
            }
        })
    };

    let placeholder = if tier.is_ranked() {
        "amount,ticket,place (one per line)\n7500000,KA123456,Kollam"
    } else {
        "Ticket numbers separated by spaces or new lines"
    };

    html! {
        <div class="bulk-entry">
            <button type="button" class="btn btn-link" onclick={on_toggle}>
                {if *expanded { "Hide bulk entry" } else { "Bulk entry" }}
            </button>
            {if *expanded {
                html! {
                    <div class="bulk-entry-panel">
                        {if tier.is_grouped() {
                            html! {
                                <input
                                    type="text"
                                    id={FieldRef::BulkAmount(tier).element_id()}
                                    placeholder="Prize amount"
                                    value={(*amount).clone()}
                                    oninput={on_amount_input}
                                />
                            }
                        } else { html! {} }}
                        <textarea
                            id={FieldRef::BulkText(tier).element_id()}
                            rows="5"
                            {placeholder}
                            value={(*text).clone()}
                            oninput={on_text_input}
                        />
                        <button type="button" class="btn btn-primary" onclick={on_import}>
                            {format!("Import {}", tier.title())}
                        </button>
                    </div>
                }
            } else { html! {} }}
        </div>
    }
}
