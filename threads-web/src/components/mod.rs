pub(crate) mod auth_panel;
pub(crate) mod composer;
pub(crate) mod lens_page;
pub(crate) mod post_list;
pub(crate) mod timeline_page;
