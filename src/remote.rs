pub(crate) mod generator;
pub(crate) mod prompt;
pub(crate) mod suggestions;
pub(crate) mod video;
