pub(crate) mod health;
pub(crate) mod lenses;
pub(crate) mod posts;
pub(crate) mod users;
