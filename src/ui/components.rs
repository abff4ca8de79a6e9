/// Reusable UI components

use crate::messages::Toast;
use crate::render::{ItemView, WindowTitle};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct MessageListProps {
    pub messages: Vec<Toast>,
}

/// Transient user messages, newest last
#[function_component(MessageList)]
pub fn message_list(props: &MessageListProps) -> Html {
    html! {
        <div id="message-display" class="message-display">
            {for props.messages.iter().map(|toast| html! {
                <p key={toast.id} class="message-paragraph">{&toast.text}</p>
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct WindowTitleProps {
    pub title: WindowTitle,
}

#[function_component(WindowTitleView)]
pub fn window_title_view(props: &WindowTitleProps) -> Html {
    html! {
        <h2 class="window-title">
            {match &props.title {
                WindowTitle::Tagged(_) => html! {
                    <>
                        {for props.title.badges().into_iter().map(|badge| html! {
                            <span class="window-tag">{badge}</span>
                        })}
                    </>
                },
                WindowTitle::Untagged(text) => html! { <>{text.clone()}</> },
            }}
        </h2>
    }
}

#[derive(Properties, PartialEq)]
pub struct ItemRowProps {
    pub view: ItemView,
    #[prop_or(false)]
    pub grouped: bool,
    /// Receives the clicked item and whether a modifier key was held
    pub onclick: Callback<(ItemView, bool)>,
}

#[function_component(ItemRow)]
pub fn item_row(props: &ItemRowProps) -> Html {
    let onclick = {
        let view = props.view.clone();
        props
            .onclick
            .reform(move |e: MouseEvent| (view.clone(), e.meta_key() || e.ctrl_key()))
    };

    let class = if props.grouped { "group-tab-item" } else { "tab-item" };

    html! {
        <li class={class} title={props.view.item.url().to_string()} onclick={onclick}>
            <img class="favicon-icon" src={props.view.icon().to_string()} />
            <span>{&props.view.title}</span>
        </li>
    }
}
