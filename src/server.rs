use std::{net::TcpListener, sync::Arc};

use actix_cors::Cors;
use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};
use log::info;

use crate::handlers;
use crate::store::EmployeeStore;

pub fn cors(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allow_any_method().allow_any_header().max_age(3600)
}

/// Starts serving on an already bound listener. The returned future must be
/// awaited (or spawned) for requests to be handled.
pub fn serve(
    listener: TcpListener,
    store: Arc<dyn EmployeeStore>,
    allowed_origins: Vec<String>,
) -> std::io::Result<Server> {
    let store = web::Data::from(store);
    info!("Starting server at {}", listener.local_addr()?);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors(&allowed_origins))
            .wrap(Logger::default())
            .app_data(store.clone())
            .configure(handlers::configure)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
