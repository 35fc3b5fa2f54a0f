pub(crate) mod instruction;
pub(crate) mod precompile;
pub(crate) mod vm;
