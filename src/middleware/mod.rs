pub mod current_user;

pub use current_user::{current_user_middleware, CurrentUser};
