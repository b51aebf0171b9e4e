use engine::DrawEdit;
use shared::{Draw, LotteryOption};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct DrawInfoFormProps {
    pub draw: Draw,
    pub lotteries: Vec<LotteryOption>,
    pub on_edit: Callback<DrawEdit>,
}

/// Lottery Draw Information section: lottery, draw number, date and flags
#[function_component(DrawInfoForm)]
pub fn draw_info_form(props: &DrawInfoFormProps) -> Html {
    let on_lottery_change = {
        let on_edit = props.on_edit.clone();
        let lotteries = props.lotteries.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let id = select.value();
            let name = lotteries
                .iter()
                .find(|lottery| lottery.id.to_string() == id)
                .map(|lottery| lottery.name.clone())
                .unwrap_or_default();
            on_edit.emit(DrawEdit::Lottery { id, name });
        })
    };

    let on_draw_number_input = {
        let on_edit = props.on_edit.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_edit.emit(DrawEdit::DrawNumber(input.value()));
        })
    };

    let on_date_change = {
        let on_edit = props.on_edit.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_edit.emit(DrawEdit::Date(input.value()));
        })
    };

    let checkbox = |id: &'static str, label: &'static str, checked: bool, edit: fn(bool) -> DrawEdit| {
        let on_edit = props.on_edit.clone();
        let onchange = Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_edit.emit(edit(input.checked()));
        });
        html! {
            <label class="checkbox" for={id}>
                <input type="checkbox" id={id} name={id} {checked} {onchange} />
                {label}
            </label>
        }
    };

    html! {
        <section class="draw-info-section">
            <h2>{"Lottery Draw Information"}</h2>

            <div class="form-group">
                <label for="lottery">{"Lottery"}</label>
                <select id="lottery" name="lottery" onchange={on_lottery_change}>
                    <option value="" selected={props.draw.lottery.is_empty()}>{"Select a lottery"}</option>
                    {for props.lotteries.iter().map(|lottery| {
                        let value = lottery.id.to_string();
                        let selected = value == props.draw.lottery;
                        html! { <option {value} {selected}>{&lottery.name}</option> }
                    })}
                </select>
            </div>

            <div class="form-group">
                <label for="draw_number">{"Draw number"}</label>
                <input
                    type="text"
                    id="draw_number"
                    name="draw_number"
                    value={props.draw.draw_number.clone()}
                    oninput={on_draw_number_input}
                />
            </div>

            <div class="form-group">
                <label for="date">{"Date"}</label>
                <input
                    type="date"
                    id="date"
                    name="date"
                    value={props.draw.date.clone()}
                    onchange={on_date_change}
                />
            </div>

            <div class="form-group checkboxes">
                {checkbox("is_published", "Published", props.draw.is_published, DrawEdit::Published)}
                {checkbox("is_bumper", "Bumper draw", props.draw.is_bumper, DrawEdit::Bumper)}
                {checkbox("notify_on_save", "Send notification on save", props.draw.notify_on_save, DrawEdit::NotifyOnSave)}
            </div>
        </section>
    }
}
