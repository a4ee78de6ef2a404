pub mod analytics;
pub mod health;
pub mod links;
pub mod redirect;
pub mod users;

pub use analytics::analytics_routes;
pub use health::{AppStartTime, HealthService, health_routes};
pub use links::links_routes;
pub use redirect::{RedirectService, redirect_routes};
pub use users::{admin_users_routes, users_routes};
