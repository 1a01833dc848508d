pub mod user;
pub mod user_face;

pub use user::User;
pub use user_face::FacePose;
