pub mod crop;
pub mod grid;
pub mod walk;
