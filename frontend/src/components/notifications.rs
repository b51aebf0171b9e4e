use yew::prelude::*;

use crate::hooks::use_result_form::Notice;

#[derive(Properties, PartialEq)]
pub struct NotificationsProps {
    pub notice: Option<Notice>,
    pub on_dismiss: Callback<()>,
}

#[function_component(Notifications)]
pub fn notifications(props: &NotificationsProps) -> Html {
    let Some(notice) = props.notice.as_ref() else {
        return html! {};
    };

    let on_dismiss = {
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_: MouseEvent| on_dismiss.emit(()))
    };

    html! {
        <div class={classes!("form-message", notice.kind.css_class())} role="status">
            <span>{&notice.text}</span>
            <button type="button" class="dismiss" onclick={on_dismiss}>{"×"}</button>
        </div>
    }
}
