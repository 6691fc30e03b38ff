pub(crate) mod maps;
