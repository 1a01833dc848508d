pub mod ekyc;
pub mod users;
