pub(crate) mod hit;
