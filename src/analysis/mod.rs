pub(crate) mod variables;
