use crate::{
    api::{attendance, qr, students},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope(&format!("{}/auth", config.api_prefix))
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication, then rate limiting
            .wrap(protected_limiter)
            .service(
                web::scope("/students")
                    // /students
                    .service(web::resource("").route(web::get().to(students::list_students)))
                    // /students/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(students::get_student))
                            .route(web::put().to(students::update_student)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/time-in").route(web::post().to(attendance::time_in)),
                    )
                    .service(
                        web::resource("/time-out/{id}")
                            .route(web::patch().to(attendance::time_out)),
                    )
                    .service(
                        web::resource("/student/{id}")
                            .route(web::get().to(attendance::student_history)),
                    )
                    .service(
                        web::resource("/date/{date}").route(web::get().to(attendance::by_date)),
                    ),
            )
            .service(
                web::scope("/qr")
                    .service(web::resource("/generate/{id}").route(web::get().to(qr::generate)))
                    .service(web::resource("/scan").route(web::post().to(qr::scan)))
                    // second path over the same attendance-history capability
                    .service(
                        web::resource("/attendance/{id}").route(web::get().to(qr::history)),
                    ),
            ),
    );
}
