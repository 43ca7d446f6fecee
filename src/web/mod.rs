mod answer;
mod comment;
mod question;
mod vote;

/// Configures the web app
///
/// @see https://docs.rs/actix-web/4.0.1/actix_web/struct.App.html#method.configure
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    answer::configure(conf);
    comment::configure(conf);
    question::configure(conf);
    vote::configure(conf);
}
