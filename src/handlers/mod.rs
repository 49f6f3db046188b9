pub mod analyze;
pub mod health;
pub mod props;
