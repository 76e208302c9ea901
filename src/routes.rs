use crate::{
    api::{attendance, fee, profile, test_score},
    auth::{handlers, middleware::session_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{
    middleware::{Condition, from_fn},
    web,
};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = 60_000 / u64::from(requests_per_min.max(1));
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min.max(1))
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("per_millisecond and burst_size are non-zero");
        Governor::new(&cfg)
    }

    // OTP dispatch costs an SMS, so it gets its own limiter
    let otp_limiter = Condition::new(
        config.rate_otp_per_min > 0,
        build_limiter(config.rate_otp_per_min),
    );

    // Login flow, open to everyone
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/send-otp")
                    .wrap(otp_limiter)
                    .route(web::post().to(handlers::send_otp)),
            )
            .service(web::resource("/verify-otp").route(web::post().to(handlers::verify_otp)))
            .service(web::resource("/back").route(web::post().to(handlers::back)))
            .service(web::resource("/logout").route(web::post().to(handlers::logout)))
            .service(web::resource("/session").route(web::get().to(handlers::session))),
    );

    // Dashboard data, needs a live session
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(session_middleware))
            .service(web::resource("/profile").route(web::get().to(profile::get_profile)))
            .service(
                web::resource("/test-scores").route(web::get().to(test_score::list_test_scores)),
            )
            .service(
                web::resource("/attendance").route(web::get().to(attendance::list_attendance)),
            )
            .service(web::resource("/fees").route(web::get().to(fee::get_fees))),
    );
}

// LOGIN
//  ├─ POST /auth/send-otp      AwaitingPhone -> AwaitingOtp
//  ├─ POST /auth/back          AwaitingOtp   -> AwaitingPhone
//  └─ POST /auth/verify-otp    AwaitingOtp   -> Verified, session saved (24h)

// DASHBOARD REQUEST
//  └─ session read on every call; expired -> cleared, 401 back to login
