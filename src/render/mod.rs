pub(crate) mod canvas;
pub(crate) mod encode;
pub(crate) mod text;
