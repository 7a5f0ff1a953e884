pub(crate) mod choice;
pub(crate) mod error;
pub(crate) mod paths;
pub(crate) mod tensor;
