pub mod profile;
pub mod turn;
