pub mod auth_routes;
pub mod team_routes;
pub mod membership_routes;
pub mod file_routes;
pub mod chat_routes;
pub mod milestone_routes;
pub mod availability_routes;
pub mod home_routes;
