use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{self, ApiError};
use crate::forms;
use crate::models::AuthResponse;
use crate::state::AppState;
use crate::storage;

fn finish_auth(state: &AppState, result: Result<AuthResponse, ApiError>) {
    match result {
        Ok(auth) => {
            if let Err(err) = storage::save_session(&auth.access_token, &auth.user) {
                state.set_error(err);
            } else {
                state.sign_in(auth.access_token, auth.user);
            }
        }
        Err(err) => state.set_error(err.to_string()),
    }
    state.loading.set(false);
}

#[component]
pub(crate) fn AuthPanel(state: AppState, on_session: Callback<()>) -> impl IntoView {
    let state_for_show = state.clone();
    let state_for_fallback = state.clone();

    view! {
        <Show
            when=move || state_for_show.is_authenticated()
            fallback=move || {
                view! {
                    <SignupCard state=state_for_fallback.clone() on_session=on_session />
                    <LoginCard state=state_for_fallback.clone() on_session=on_session />
                }
            }
        >
            <SessionBar state=state.clone() />
        </Show>
    }
}

#[component]
fn SessionBar(state: AppState) -> impl IntoView {
    let user_text = {
        let state = state.clone();
        move || {
            state
                .user
                .get()
                .map(|u| format!("{} (@{})", u.name, u.username))
                .unwrap_or_default()
        }
    };

    let on_logout = {
        let state = state.clone();
        move |_| {
            if let Err(err) = storage::clear_session() {
                state.set_error(err);
                return;
            }
            state.sign_out();
        }
    };

    view! {
        <div class="session-bar">
            <span>"Signed in as " {user_text}</span>
            <button on:click=on_logout disabled=move || state.loading.get()>
                "Logout"
            </button>
        </div>
    }
}

#[component]
fn SignupCard(state: AppState, on_session: Callback<()>) -> impl IntoView {
    let name = RwSignal::new(String::new());
    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let show_password = RwSignal::new(false);
    let is_student = RwSignal::new(false);
    let school = RwSignal::new(String::new());
    let programs = RwSignal::new(String::new());
    let batch = RwSignal::new(String::new());

    let on_signup = {
        let state = state.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            state.clear_error();

            let form = forms::build_signup(
                &name.get(),
                &username.get(),
                &email.get(),
                &password.get(),
                is_student.get(),
                &school.get(),
                &programs.get(),
                &batch.get(),
            );
            if let Err(message) = forms::validate_signup(&form) {
                state.set_error(message);
                return;
            }

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                let result = api::signup(&form).await;
                let ok = result.is_ok();
                finish_auth(&state2, result);
                if ok {
                    password.set(String::new());
                    on_session.run(());
                }
            });
        }
    };

    view! {
        <div class="card">
            <h2>"Sign up"</h2>
            <form on:submit=on_signup>
                <input
                    placeholder="Full name"
                    prop:value=move || name.get()
                    on:input=move |ev| name.set(event_target_value(&ev))
                />
                <input
                    placeholder="Username"
                    prop:value=move || username.get()
                    on:input=move |ev| username.set(event_target_value(&ev))
                />
                <input
                    placeholder="Email address"
                    type="email"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <div class="password-row">
                    <input
                        placeholder="Password"
                        type=move || if show_password.get() { "text" } else { "password" }
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button type="button" on:click=move |_| show_password.update(|v| *v = !*v)>
                        {move || if show_password.get() { "Hide" } else { "Show" }}
                    </button>
                </div>
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || is_student.get()
                        on:change=move |ev| is_student.set(event_target_checked(&ev))
                    />
                    " I am a student"
                </label>
                <Show when=move || is_student.get()>
                    <input
                        placeholder="School"
                        prop:value=move || school.get()
                        on:input=move |ev| school.set(event_target_value(&ev))
                    />
                    <input
                        placeholder="Programs"
                        prop:value=move || programs.get()
                        on:input=move |ev| programs.set(event_target_value(&ev))
                    />
                    <input
                        placeholder="Batch"
                        prop:value=move || batch.get()
                        on:input=move |ev| batch.set(event_target_value(&ev))
                    />
                </Show>
                <button type="submit" disabled=move || state.loading.get()>"Sign up"</button>
            </form>
        </div>
    }
}

#[component]
fn LoginCard(state: AppState, on_session: Callback<()>) -> impl IntoView {
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());

    let on_login = {
        let state = state.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            state.clear_error();

            let login = username.get().trim().to_string();
            let secret = password.get();

            if login.is_empty() || secret.is_empty() {
                state.set_error("Enter username and password");
                return;
            }

            state.loading.set(true);
            let state2 = state.clone();
            spawn_local(async move {
                let result = api::login(&login, &secret).await;
                let ok = result.is_ok();
                finish_auth(&state2, result);
                if ok {
                    password.set(String::new());
                    on_session.run(());
                }
            });
        }
    };

    view! {
        <div class="card">
            <h2>"Log in"</h2>
            <form on:submit=on_login>
                <input
                    placeholder="Username"
                    prop:value=move || username.get()
                    on:input=move |ev| username.set(event_target_value(&ev))
                />
                <input
                    placeholder="Password"
                    type="password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || state.loading.get()>"Log in"</button>
            </form>
        </div>
    }
}
