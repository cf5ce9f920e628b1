use leptos::prelude::*;

use crate::api;
use crate::components::auth_panel::AuthPanel;
use crate::components::composer::Composer;
use crate::components::lens_page::LensPage;
use crate::components::post_list::PostList;
use crate::components::timeline_page::TimelinePage;
use crate::state::{AppState, Page};
use crate::storage;

fn load_feed(state: AppState) {
    let Some(token) = state.token.get_untracked() else {
        state.posts.set(Vec::new());
        return;
    };

    state.loading.set(true);
    state.clear_error();

    leptos::task::spawn_local(async move {
        match api::feed(&token).await {
            Ok(posts) => state.posts.set(posts),
            Err(err) => state.set_error(err.to_string()),
        }
        state.loading.set(false);
    });
}

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();

    if let Some(token) = storage::load_token() {
        state.token.set(Some(token));
    }
    if let Some(user) = storage::load_user() {
        state.user.set(Some(user));
    }

    load_feed(state.clone());

    let on_session = Callback::new({
        let state = state.clone();
        move |_| load_feed(state.clone())
    });

    let error_text = {
        let state = state.clone();
        move || state.error.get().unwrap_or_default()
    };

    let current_page = state.page;
    let nav = move |page: Page, label: &'static str| {
        view! {
            <button
                class=("active", move || current_page.get() == page)
                on:click=move |_| current_page.set(page)
            >
                {label}
            </button>
        }
    };

    let state_for_error = state.clone();
    let state_for_pages = state.clone();

    view! {
        <main class="page">
            <section class="container">
                <h1>"Threads"</h1>
                <nav>
                    {nav(Page::Feed, "Feed")}
                    {nav(Page::Timeline, "Timeline")}
                    {nav(Page::Lenses, "AR Lenses")}
                </nav>

                <AuthPanel state=state.clone() on_session=on_session />

                <Show when=move || state_for_error.error.get().is_some()>
                    <div class="error-banner">
                        <strong>"Error: "</strong>
                        {error_text.clone()}
                    </div>
                </Show>

                {move || {
                    let state = state_for_pages.clone();
                    match state.page.get() {
                        Page::Feed => view! { <FeedPage state=state on_refresh=on_session /> }.into_any(),
                        Page::Timeline => view! { <TimelinePage state=state /> }.into_any(),
                        Page::Lenses => view! { <LensPage state=state /> }.into_any(),
                    }
                }}
            </section>
        </main>
    }
}

#[component]
fn FeedPage(state: AppState, on_refresh: Callback<()>) -> impl IntoView {
    let state_for_show = state.clone();
    let state_for_list = state.clone();
    let loading = state.loading;

    view! {
        <Show
            when=move || state_for_show.is_authenticated()
            fallback=|| view! { <p class="muted">"Log in to see posts from people you follow."</p> }
        >
            <h2>"Feed"</h2>
            <Composer state=state.clone() />
            <button on:click=move |_| on_refresh.run(()) disabled=move || loading.get()>
                "Refresh feed"
            </button>
            <PostList state=state_for_list.clone() posts=state_for_list.posts />
        </Show>
    }
}
