mod actix;
pub use actix::ActixConfig;

mod cors;
pub use cors::CorsConfig;
