use actix_web::{App, HttpServer, middleware, web};
use xray_backend::config::Config;
use xray_backend::pipeline::Model;
use xray_backend::routes::{configure_routes, cors};
use xray_backend::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::load().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let model = match Model::load(&config.model_path) {
        Ok(model) => {
            log::info!(
                "Model loaded successfully from {}!",
                config.model_path.display()
            );
            Some(model)
        }
        Err(e) => {
            log::error!("Error loading model: {}", e);
            log::warn!("Serving in degraded mode: /predict will fail until the model is fixed and the server restarted");
            None
        }
    };

    let state = web::Data::new(AppState::new(model, &config));
    let allowed_origins = config.allowed_origins.clone();
    let bind_address = config.bind_address();

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&allowed_origins))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
