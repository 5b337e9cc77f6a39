pub mod adjusted;
pub mod naive;
pub mod summary;
