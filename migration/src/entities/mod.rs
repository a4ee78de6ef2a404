pub mod hit;
pub mod link;
pub mod user;

pub use hit::Entity as HitEntity;
pub use link::Entity as LinkEntity;
pub use user::Entity as UserEntity;
