pub mod user;
pub mod user_cache;
pub mod user_source;
pub mod user_source_impl;

pub use user::{User, UserId};
pub use user_cache::UserCache;
pub use user_source::{FetchError, SharedUserSource, UserSource};
pub use user_source_impl::HttpUserSource;
