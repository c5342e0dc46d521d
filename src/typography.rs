pub(crate) mod engine;
pub(crate) mod fonts;
pub(crate) mod style;
