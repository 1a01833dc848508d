mod extractor;
mod jwt;

pub use extractor::AuthUser;
pub use jwt::{decode_token, encode_token, Claims};
