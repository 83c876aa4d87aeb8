use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use deck_server::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();

    let upload_root = config.upload_root();
    std::fs::create_dir_all(&upload_root)?;
    log::info!("Uploads go to {}", upload_root.display());

    if config.gemini().is_none() {
        log::warn!("No GEMINI_API_KEY set; /generate will reject requests");
    }

    let bind = config.bind.clone();
    let config = web::Data::new(config);

    log::info!("Starting server at http://{}", bind);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .configure(|cfg| deck_server::configure(cfg, &config))
    })
    .bind(bind)?
    .run()
    .await
}
