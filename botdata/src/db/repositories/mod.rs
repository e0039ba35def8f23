// Repository layer for database operations

pub mod guild;
pub mod permission;
pub(crate) mod queries;
pub mod user;

pub use guild::GuildRepository;
pub use permission::PermissionRepository;
pub use user::UserRepository;
