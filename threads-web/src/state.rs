use leptos::prelude::*;

use crate::models::{Post, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Page {
    Feed,
    Timeline,
    Lenses,
}

#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub(crate) token: RwSignal<Option<String>>,
    pub(crate) user: RwSignal<Option<User>>,
    pub(crate) posts: RwSignal<Vec<Post>>,
    pub(crate) page: RwSignal<Page>,
    pub(crate) error: RwSignal<Option<String>>,
    pub(crate) loading: RwSignal<bool>,
}

impl AppState {
    pub(crate) fn new() -> Self {
        Self {
            token: RwSignal::new(None),
            user: RwSignal::new(None),
            posts: RwSignal::new(Vec::new()),
            page: RwSignal::new(Page::Feed),
            error: RwSignal::new(None),
            loading: RwSignal::new(false),
        }
    }

    pub(crate) fn set_error(&self, message: impl Into<String>) {
        self.error.set(Some(message.into()));
    }

    pub(crate) fn clear_error(&self) {
        self.error.set(None);
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.token.get().is_some()
    }

    pub(crate) fn sign_in(&self, token: String, user: User) {
        self.token.set(Some(token));
        self.user.set(Some(user));
        self.clear_error();
    }

    pub(crate) fn sign_out(&self) {
        self.token.set(None);
        self.user.set(None);
        self.posts.set(Vec::new());
        self.page.set(Page::Feed);
        self.clear_error();
    }

    pub(crate) fn current_user_id(&self) -> Option<i64> {
        self.user.get().map(|user| user.id)
    }
}
