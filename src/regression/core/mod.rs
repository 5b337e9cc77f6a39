pub mod data;
pub mod likelihood;
pub mod misclass;
pub mod options;
