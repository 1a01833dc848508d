//! Repository layer: trait seams for the orchestrators plus the sqlx/Postgres
//! implementations behind them.

pub mod faces;
pub mod sessions;
pub mod traits;
pub mod users;

pub use faces::UserFaceRepository;
pub use sessions::SessionTokenRepository;
pub use traits::{SessionRepositoryTrait, UserFaceRepositoryTrait, UserRepositoryTrait};
pub use users::UserRepository;
