pub(crate) mod alphabet;
pub(crate) mod tables;
