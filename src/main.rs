// Third-party dependencies
use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use log::info;

use pma_service::routes::{
    auth_routes, availability_routes, chat_routes, file_routes, home_routes, membership_routes,
    milestone_routes, team_routes,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let address =
        std::env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1:9090".to_string());

    std::fs::create_dir_all("./storage")?;

    info!("Server started at {}", address);

    HttpServer::new(|| {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .configure(auth_routes::init_routes)
            .configure(team_routes::init_routes)
            .configure(membership_routes::init_routes)
            .configure(file_routes::init_routes)
            .configure(chat_routes::init_routes)
            .configure(milestone_routes::init_routes)
            .configure(availability_routes::init_routes)
            .configure(home_routes::init_routes)
    })
    .bind(address)?
    .run()
    .await
}
