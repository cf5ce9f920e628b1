use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::forms;
use crate::models::Post;
use crate::state::AppState;

#[component]
pub(crate) fn PostList(state: AppState, posts: RwSignal<Vec<Post>>) -> impl IntoView {
    let on_like = Callback::new({
        let state = state.clone();
        move |post_id: i64| {
            state.clear_error();
            let (Some(token), Some(user_id)) = (state.token.get(), state.current_user_id()) else {
                state.set_error("Log in to like posts");
                return;
            };

            let state2 = state.clone();
            spawn_local(async move {
                match api::toggle_like(&token, post_id).await {
                    Ok(_) => posts.update(|posts| forms::toggle_like_locally(posts, post_id, user_id)),
                    Err(err) => state2.set_error(err.to_string()),
                }
            });
        }
    });

    let on_reply = Callback::new({
        let state = state.clone();
        move |(post_id, text, draft): (i64, String, RwSignal<String>)| {
            state.clear_error();
            let Some(token) = state.token.get() else {
                state.set_error("Log in to reply");
                return;
            };
            if text.trim().is_empty() {
                state.set_error("Reply text is required");
                return;
            }

            let state2 = state.clone();
            spawn_local(async move {
                match api::reply(&token, post_id, &text).await {
                    Ok(reply) => {
                        posts.update(|posts| {
                            if let Some(post) = posts.iter_mut().find(|p| p.id == post_id) {
                                post.replies.push(reply);
                            }
                        });
                        draft.set(String::new());
                    }
                    Err(err) => state2.set_error(err.to_string()),
                }
            });
        }
    });

    let on_delete = Callback::new({
        let state = state.clone();
        move |post_id: i64| {
            state.clear_error();
            let Some(token) = state.token.get() else {
                state.set_error("Log in to delete posts");
                return;
            };

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                match api::delete_post(&token, post_id).await {
                    Ok(()) => posts.update(|posts| posts.retain(|p| p.id != post_id)),
                    Err(err) => state2.set_error(err.to_string()),
                }
                state2.loading.set(false);
            });
        }
    });

    view! {
        <Show when=move || posts.get().is_empty()>
            <p class="muted">"No posts yet."</p>
        </Show>
        <ul class="posts">
            <For
                each=move || posts.get()
                key=|post| (post.id, post.likes.len(), post.replies.len())
                children=move |post| {
                    let state = state.clone();
                    let post_id = post.id;
                    let author_id = post.posted_by;
                    let liked = forms::is_liked_by(&post, state.current_user_id());
                    let draft = RwSignal::new(String::new());
                    let state_for_actions = state.clone();
                    let state_for_owner = state.clone();

                    view! {
                        <li class="post">
                            <div>{post.text.clone()}</div>
                            {post.img.clone().map(|src| view! { <img class="post-img" src=src /> })}
                            <small>{format!("#{} by user {} at {}", post_id, author_id, post.created_at)}</small>

                            <div class="post-actions">
                                <button on:click=move |_| on_like.run(post_id)>
                                    {if liked { "Unlike" } else { "Like" }}
                                </button>
                                <span>{format!(" {} likes", post.likes.len())}</span>
                                <Show when=move || state_for_owner.current_user_id() == Some(author_id)>
                                    <button
                                        style="margin-left: 0.5rem;"
                                        on:click=move |_| on_delete.run(post_id)
                                    >
                                        "Delete"
                                    </button>
                                </Show>
                            </div>

                            <ul class="replies">
                                {post
                                    .replies
                                    .iter()
                                    .map(|reply| {
                                        view! {
                                            <li>
                                                <strong>{format!("@{}", reply.username)}</strong>
                                                " "
                                                {reply.text.clone()}
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>

                            <Show when=move || state_for_actions.is_authenticated()>
                                <div class="reply-box">
                                    <input
                                        placeholder="Reply..."
                                        prop:value=move || draft.get()
                                        on:input=move |ev| draft.set(event_target_value(&ev))
                                    />
                                    <button on:click=move |_| on_reply.run((post_id, draft.get(), draft))>
                                        "Reply"
                                    </button>
                                </div>
                            </Show>
                        </li>
                    }
                }
            />
        </ul>
    }
}
