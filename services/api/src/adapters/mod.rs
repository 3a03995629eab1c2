pub mod digest_file;
pub mod sessions;
pub mod user_file;

pub use digest_file::JsonDigestStore;
pub use sessions::InMemorySessionStore;
pub use user_file::JsonUserStore;
