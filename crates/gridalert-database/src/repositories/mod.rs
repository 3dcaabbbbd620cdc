//! Repository implementations, one file per backing table group.

pub mod asset;
pub mod org;
pub mod preference;
pub mod token;
pub mod user;

pub use asset::PgAssetRepository;
pub use org::PgOrgRepository;
pub use preference::PgPreferenceStore;
pub use token::PgTokenStore;
pub use user::PgUserRepository;
