pub(crate) mod post_service;
pub(crate) mod user_service;

#[cfg(test)]
pub(crate) mod fakes;
