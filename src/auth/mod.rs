mod bearer;
pub mod jwt;
pub mod password;

pub use bearer::CurrentUser;
pub use jwt::{Claims, JwtHandler, TokenError, TokenType};
