pub mod disclosure;
pub mod guard;
pub mod repository;
pub mod types;
pub mod visibility;
