use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::forms;
use crate::state::AppState;

/// New-post form. The image is an http(s) URL or a data URI; the server
/// uploads it to the asset store.
#[component]
pub(crate) fn Composer(state: AppState) -> impl IntoView {
    let text = RwSignal::new(String::new());
    let img = RwSignal::new(String::new());

    let on_submit = {
        let state = state.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            state.clear_error();

            let body = text.get();
            if let Err(message) = forms::validate_post_text(&body) {
                state.set_error(message);
                return;
            }

            let (Some(token), Some(user_id)) = (state.token.get(), state.current_user_id()) else {
                state.set_error("Log in to post");
                return;
            };
            let image = forms::trimmed_or_none(&img.get());

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                match api::create_post(&token, user_id, &body, image).await {
                    Ok(created) => {
                        state2.posts.update(|posts| posts.insert(0, created));
                        text.set(String::new());
                        img.set(String::new());
                        state2.clear_error();
                    }
                    Err(err) => state2.set_error(err.to_string()),
                }
                state2.loading.set(false);
            });
        }
    };

    let remaining = move || forms::remaining_chars(&text.get());

    view! {
        <form class="composer" on:submit=on_submit>
            <textarea
                placeholder="Start a thread..."
                prop:value=move || text.get()
                on:input=move |ev| text.set(event_target_value(&ev))
            ></textarea>
            <input
                placeholder="Image URL (optional)"
                prop:value=move || img.get()
                on:input=move |ev| img.set(event_target_value(&ev))
            />
            <small class=("over-limit", move || remaining() < 0)>{remaining}</small>
            <button type="submit" disabled=move || state.loading.get() || remaining() < 0>
                "Post"
            </button>
        </form>
    }
}
