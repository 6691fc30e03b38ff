pub(crate) mod card;
pub(crate) mod edit;
pub(crate) mod template;
