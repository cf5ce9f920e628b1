use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::state::AppState;

const EMBED_SCRIPT_SRC: &str = "https://www.snapchat.com/embed.js";

/// Snippets inserted through `inner_html` do not run their `<script>` tags,
/// so the embed loader is appended to the body once.
fn ensure_embed_script() -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| "document is not available".to_string())?;

    let selector = format!("script[src=\"{EMBED_SCRIPT_SRC}\"]");
    if let Ok(Some(existing)) = document.query_selector(&selector) {
        existing.remove();
    }

    let script = document
        .create_element("script")
        .map_err(|_| "failed to create script element".to_string())?;
    script
        .set_attribute("src", EMBED_SCRIPT_SRC)
        .map_err(|_| "failed to set script src".to_string())?;
    script
        .set_attribute("async", "")
        .map_err(|_| "failed to set script async".to_string())?;

    let body = document
        .body()
        .ok_or_else(|| "document body is not available".to_string())?;
    body.append_child(&script)
        .map_err(|_| "failed to attach embed script".to_string())?;
    Ok(())
}

#[component]
pub(crate) fn LensPage(state: AppState) -> impl IntoView {
    let embeds = RwSignal::new(Vec::<String>::new());

    state.loading.set(true);
    state.clear_error();
    {
        let state = state.clone();
        spawn_local(async move {
            match api::lenses().await {
                Ok(found) => {
                    embeds.set(found);
                    if let Err(err) = ensure_embed_script() {
                        state.set_error(err);
                    }
                }
                Err(err) => state.set_error(err.to_string()),
            }
            state.loading.set(false);
        });
    }

    view! {
        <h2>"AR Lenses"</h2>
        <div class="lenses">
            <For
                each=move || embeds.get().into_iter().enumerate()
                key=|(idx, _)| *idx
                children=move |(_, html)| view! { <div class="lens" inner_html=html></div> }
            />
        </div>
    }
}
