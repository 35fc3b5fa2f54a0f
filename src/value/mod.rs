pub(crate) mod model;
pub(crate) mod walk;
pub(crate) mod wire;
