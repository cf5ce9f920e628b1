pub(crate) mod cloudinary;
pub(crate) mod postgres;
