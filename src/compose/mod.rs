pub(crate) mod builder;
pub(crate) mod doc;
pub(crate) mod fallback;
pub(crate) mod ops;
