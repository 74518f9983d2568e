use crate::{api::attendance, auth::middleware::auth_middleware, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{Scope, middleware::from_fn, web};
use anyhow::anyhow;
use std::sync::Arc;

pub type Limiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter allowing `requests_per_min` with an equal burst.
pub fn build_limiter(requests_per_min: u32) -> anyhow::Result<Limiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min} per minute"))?;

    Ok(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, protected_limiter: Arc<Limiter>) {
    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(attendance_scope()),
    );
}

pub fn attendance_scope() -> Scope {
    web::scope("/attendance")
        // /attendance/checkin
        .service(web::resource("/checkin").route(web::post().to(attendance::check_in)))
        // /attendance/checkout
        .service(web::resource("/checkout").route(web::post().to(attendance::check_out)))
        // /attendance/backup
        .service(web::resource("/backup").route(web::get().to(attendance::download_backup)))
        // /attendance/today
        .service(web::resource("/today").route(web::get().to(attendance::today)))
        // /attendance/today/all
        .service(web::resource("/today/all").route(web::get().to(attendance::today_all)))
}
