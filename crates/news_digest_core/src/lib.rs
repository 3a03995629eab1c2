pub mod domain;
pub mod ports;
pub mod presentation;
pub mod views;

pub use domain::{Article, CategoryMap, Digest, ProfileUpdate, PublicUser, Session, User};
pub use ports::{DigestSource, PortError, PortResult, SessionStore, UserRepository};
pub use presentation::{FeedView, RefreshPolicy};
pub use views::{CategorizedView, DigestSummary, PersonalizedDigest};
