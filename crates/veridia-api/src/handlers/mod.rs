pub mod ekyc;
pub mod health;
pub mod users;
