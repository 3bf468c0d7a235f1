pub mod order_status;
pub mod order_type;
