use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::post_list::PostList;
use crate::forms;
use crate::models::{Post, Profile};
use crate::state::AppState;
use crate::storage;

#[component]
pub(crate) fn TimelinePage(state: AppState) -> impl IntoView {
    let query = RwSignal::new(String::new());
    let profile = RwSignal::new(None::<Profile>);
    let posts = RwSignal::new(Vec::<Post>::new());

    let on_search = {
        let state = state.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            state.clear_error();

            let username = query.get().trim().to_string();
            if username.is_empty() {
                state.set_error("Enter a username");
                return;
            }

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                match api::get_profile(&username).await {
                    Ok(found) => profile.set(Some(found)),
                    Err(err) => {
                        profile.set(None);
                        posts.set(Vec::new());
                        state2.set_error(err.to_string());
                        state2.loading.set(false);
                        return;
                    }
                }
                match api::user_posts(&username).await {
                    Ok(found) => posts.set(found),
                    Err(err) => state2.set_error(err.to_string()),
                }
                state2.loading.set(false);
            });
        }
    };

    let on_follow = {
        let state = state.clone();
        move |_: leptos::ev::MouseEvent| {
            state.clear_error();
            let Some(target) = profile.get() else {
                return;
            };
            let Some(token) = state.token.get() else {
                state.set_error("Log in to follow users");
                return;
            };

            let state2 = state.clone();
            spawn_local(async move {
                match api::toggle_follow(&token, target.id).await {
                    Ok(_) => {
                        state2.user.update(|user| {
                            if let Some(user) = user {
                                forms::toggle_following_locally(&mut user.following, target.id);
                                if let Err(err) = storage::save_user(user) {
                                    leptos::logging::warn!("{err}");
                                }
                            }
                        });
                    }
                    Err(err) => state2.set_error(err.to_string()),
                }
            });
        }
    };

    let follow_label = {
        let state = state.clone();
        move || {
            let following = match (state.user.get(), profile.get()) {
                (Some(user), Some(target)) => user.following.contains(&target.id),
                _ => false,
            };
            if following { "Unfollow" } else { "Follow" }
        }
    };

    let state_for_follow = state.clone();
    let state_for_list = state.clone();

    view! {
        <h2>"Timeline"</h2>
        <form on:submit=on_search>
            <input
                placeholder="username"
                prop:value=move || query.get()
                on:input=move |ev| query.set(event_target_value(&ev))
            />
            <button type="submit" disabled=move || state.loading.get()>"Show posts"</button>
        </form>

        {move || {
            profile
                .get()
                .map(|found| {
                    let state_for_follow = state_for_follow.clone();
                    let on_follow = on_follow.clone();
                    let follow_label = follow_label.clone();
                    let own = state_for_follow.current_user_id() == Some(found.id);
                    view! {
                        <div class="profile">
                            <strong>{format!("{} (@{})", found.name, found.username)}</strong>
                            <p>{found.bio.clone()}</p>
                            <Show when=move || state_for_follow.is_authenticated() && !own>
                                <button on:click=on_follow.clone()>{follow_label.clone()}</button>
                            </Show>
                        </div>
                    }
                })
        }}

        <PostList state=state_for_list posts=posts />
    }
}
