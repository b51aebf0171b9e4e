use engine::{PreviewDocument, PreviewHeader, PrizeCard, TicketLayout, NO_DATA_MESSAGE};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PreviewPanelProps {
    pub document: Option<PreviewDocument>,
    pub visible: bool,
    pub on_toggle: Callback<()>,
}

fn render_header(header: &PreviewHeader) -> Html {
    html! {
        <div class="mobile-header">
            <div class="date">{&header.date}</div>
            <div class="draw-number">{format!("# {}", header.draw_number)}</div>
            {if !header.lottery_name.is_empty() {
                html! { <div class="lottery-name">{&header.lottery_name}</div> }
            } else { html! {} }}
            <span class={classes!("badge", if header.published { "published" } else { "draft" })}>
                {if header.published { "Published" } else { "Draft" }}
            </span>
            {if header.bumper {
                html! { <span class="badge bumper">{"Bumper"}</span> }
            } else { html! {} }}
        </div>
    }
}

fn render_card(card: &PrizeCard) -> Html {
    let numbers = match card.layout {
        TicketLayout::WithPlace => html! {
            <>
                {for card.tickets.iter().map(|ticket| html! {
                    <div class="winning-number with-place">
                        <span class="ticket-number">{&ticket.ticket}</span>
                        {if let Some(place) = ticket.place.as_ref() {
                            html! { <span class="place-name">{place}</span> }
                        } else { html! {} }}
                    </div>
                })}
            </>
        },
        TicketLayout::Grid => html! {
            <div class="multiple-numbers-grid">
                {for card.tickets.iter().map(|ticket| html! {
                    <div class="number-item">{&ticket.ticket}</div>
                })}
            </div>
        },
        TicketLayout::List => html! {
            <>
                {for card.tickets.iter().map(|ticket| html! {
                    <div class="winning-number"><span class="ticket-number">{&ticket.ticket}</span></div>
                })}
            </>
        },
    };

    html! {
        <div class="prize-card" key={card.tier.key()}>
            <div class="prize-header">{&card.title}</div>
            <div class="prize-content">
                <div class="prize-amount">{&card.amount}</div>
                <div class="winning-numbers">{numbers}</div>
            </div>
        </div>
    }
}

/// Mobile-style preview of the result, shown beside the form
#[function_component(PreviewPanel)]
pub fn preview_panel(props: &PreviewPanelProps) -> Html {
    let on_toggle = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_: MouseEvent| on_toggle.emit(()))
    };

    let body = match props.document.as_ref() {
        None | Some(PreviewDocument::NoData) => html! {
            <div class="no-data-message">{NO_DATA_MESSAGE}</div>
        },
        Some(PreviewDocument::Ready { header, cards, .. }) => html! {
            <>
                {header.as_ref().map(render_header).unwrap_or_default()}
                {for cards.iter().map(render_card)}
            </>
        },
    };

    html! {
        <aside class={classes!("preview-panel", props.visible.then_some("visible"))}>
            <button type="button" class="btn preview-toggle" onclick={on_toggle}>
                {if props.visible { "Hide preview" } else { "Show preview" }}
            </button>
            {if props.visible {
                html! { <div class="preview-content">{body}</div> }
            } else { html! {} }}
        </aside>
    }
}
