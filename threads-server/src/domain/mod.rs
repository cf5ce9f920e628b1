pub(crate) mod error;
pub(crate) mod lens;
pub(crate) mod post;
pub(crate) mod user;
