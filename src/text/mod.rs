pub(crate) mod caption;
pub(crate) mod engine;
pub(crate) mod font;
