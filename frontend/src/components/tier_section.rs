use engine::{FieldIssue, FieldRef, SlotId, SlotStatus, TierEntries};
use shared::PrizeTier;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::bulk_entry_panel::BulkEntryPanel;
use crate::hooks::use_result_form::{BulkImportInput, FieldInput, TicketInput};

#[derive(Properties, PartialEq)]
pub struct TierSectionProps {
    pub entries: TierEntries,
    pub issues: Vec<FieldIssue>,
    pub on_ticket_input: Callback<TicketInput>,
    pub on_ticket_blur: Callback<SlotId>,
    pub on_amount_input: Callback<FieldInput>,
    pub on_place_input: Callback<FieldInput>,
    pub on_add_entry: Callback<PrizeTier>,
    pub on_remove_entry: Callback<(PrizeTier, usize)>,
    pub on_clear_all: Callback<PrizeTier>,
    pub on_bulk_import: Callback<BulkImportInput, bool>,
}

fn status_marker(status: &SlotStatus) -> Html {
    match status {
        SlotStatus::Unsaved => html! {},
        SlotStatus::Saving => html! { <span class="slot-status saving">{"Saving..."}</span> },
        SlotStatus::Saved => html! { <span class="slot-status saved">{"✓ Saved"}</span> },
        SlotStatus::Failed(detail) => {
            html! { <span class="slot-status failed" title={detail.clone()}>{format!("✗ {}", detail)}</span> }
        }
    }
}

/// One prize tier: its entries, their inputs and the tier-level actions
#[function_component(TierSection)]
pub fn tier_section(props: &TierSectionProps) -> Html {
    let tier = props.entries.tier;
    let has_issue = |field: FieldRef| props.issues.iter().any(|issue| issue.field == field);

    let entries = props.entries.entries().iter().map(|entry| {
        let index = entry.index;
        let editable = tier.is_ranked() || index == 0;
        let amount_field = FieldRef::Amount { tier, entry: index };

        let on_amount_input = {
            let on_amount_input = props.on_amount_input.clone();
            Callback::from(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                on_amount_input.emit(FieldInput { tier, entry: index, value: input.value() });
            })
        };

        let slots = entry.slots.iter().enumerate().map(|(slot_index, slot)| {
            let field = FieldRef::Ticket { tier, entry: index, slot: slot_index };
            let on_input = {
                let on_ticket_input = props.on_ticket_input.clone();
                Callback::from(move |e: InputEvent| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    on_ticket_input.emit(TicketInput { tier, entry: index, slot: slot_index, value: input.value() });
                })
            };
            let on_blur = {
                let on_ticket_blur = props.on_ticket_blur.clone();
                let id = slot.id;
                Callback::from(move |_: FocusEvent| {
                    if tier.is_grouped() {
                        on_ticket_blur.emit(id);
                    }
                })
            };
            let digit_length = tier.layout().digit_length;

            html! {
                <div class="ticket-slot" key={slot.id.0}>
                    <span class="ordinal">{slot.ordinal.map(|n| n.to_string()).unwrap_or_default()}</span>
                    <input
                        type="text"
                        id={field.element_id()}
                        name={tier.ticket_field()}
                        class={classes!("ticket-input", has_issue(field).then_some("invalid"))}
                        inputmode={digit_length.map(|_| "numeric")}
                        maxlength={digit_length.map(|n| n.to_string())}
                        placeholder="Ticket number"
                        value={slot.value.clone()}
                        oninput={on_input}
                        onblur={on_blur}
                    />
                    {status_marker(&slot.status)}
                </div>
            }
        });

        let place = if tier.is_ranked() {
            let on_place_input = {
                let on_place_input = props.on_place_input.clone();
                Callback::from(move |e: InputEvent| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    on_place_input.emit(FieldInput { tier, entry: index, value: input.value() });
                })
            };
            let field = FieldRef::Place { tier, entry: index };
            html! {
                <input
                    type="text"
                    id={field.element_id()}
                    name={tier.place_field()}
                    class={classes!("place-input", has_issue(field).then_some("invalid"))}
                    placeholder="Place"
                    value={entry.place.clone()}
                    oninput={on_place_input}
                />
            }
        } else {
            html! {}
        };

        let remove = if index > 0 {
            let on_remove_entry = props.on_remove_entry.clone();
            let onclick = Callback::from(move |_: MouseEvent| on_remove_entry.emit((tier, index)));
            html! { <button type="button" class="btn btn-remove" {onclick}>{"Remove"}</button> }
        } else {
            html! {}
        };

        html! {
            <div class="prize-entry" key={entry.slots[0].id.0}>
                <input
                    type="text"
                    id={amount_field.element_id()}
                    name={tier.amount_field()}
                    class={classes!("amount-input", (!editable).then_some("mirror"), has_issue(amount_field).then_some("invalid"))}
                    placeholder="Prize amount"
                    readonly={!editable}
                    value={entry.amount.clone()}
                    oninput={on_amount_input}
                />
                <div class={classes!("ticket-row", format!("width-{}", tier.row_width()))}>
                    {for slots}
                </div>
                {place}
                {remove}
            </div>
        }
    });

    let on_add = {
        let on_add_entry = props.on_add_entry.clone();
        Callback::from(move |_: MouseEvent| on_add_entry.emit(tier))
    };
    let on_clear = {
        let on_clear_all = props.on_clear_all.clone();
        Callback::from(move |_: MouseEvent| on_clear_all.emit(tier))
    };

    html! {
        <section class="prize-section" id={format!("{}-entries", tier.key())}>
            <div class="prize-section-header">
                <h3>{tier.title()}</h3>
                <span class="ticket-count">{format!("{} tickets", props.entries.ticket_count())}</span>
                <button type="button" class="btn btn-clear" onclick={on_clear}>{"Clear all"}</button>
            </div>

            {if !props.issues.is_empty() {
                html! {
                    <ul class="field-issues">
                        {for props.issues.iter().map(|issue| html! { <li>{issue.error.to_string()}</li> })}
                    </ul>
                }
            } else { html! {} }}

            {for entries}

            <button type="button" class="btn btn-add" onclick={on_add}>{"+ Add entry"}</button>
            <BulkEntryPanel tier={tier} on_import={props.on_bulk_import.clone()} />
        </section>
    }
}
