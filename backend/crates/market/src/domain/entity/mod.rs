pub mod order;
pub mod share;
