pub mod collection;
pub mod game;
pub mod publisher;
pub mod report;
pub mod tag;
pub mod user;

pub use collection::Collection;
pub use game::Game;
pub use publisher::Publisher;
pub use report::Report;
pub use tag::Tag;
pub use user::{PasswordError, User};
