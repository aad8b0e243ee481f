//! HTTP handlers and route configuration.

mod admin_categories;
mod admin_posts;
mod auth;
mod blog;
mod forms;
mod health;
mod profile;
mod seo;


use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").route("/health", web::get().to(health::health_check)))
        // Public pages
        .route("/", web::get().to(blog::index))
        .route("/blog", web::get().to(blog::index))
        .route("/blog/{slug}", web::get().to(blog::show))
        .route("/category/{slug}", web::get().to(blog::category))
        // Session
        .route("/login", web::get().to(auth::login_form))
        .route("/login", web::post().to(auth::login))
        .route("/logout", web::post().to(auth::logout))
        // Admin
        .service(
            web::scope("/admin")
                .route("", web::get().to(admin_posts::dashboard))
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(admin_posts::index))
                        .route("", web::post().to(admin_posts::store))
                        .route("/create", web::get().to(admin_posts::create))
                        .route("/upload-image", web::post().to(admin_posts::upload_image))
                        .route("/{id}", web::put().to(admin_posts::update))
                        .route("/{id}", web::delete().to(admin_posts::destroy))
                        .route("/{id}/edit", web::get().to(admin_posts::edit))
                        .route("/{id}/preview", web::get().to(admin_posts::preview)),
                )
                .service(
                    web::scope("/categories")
                        .route("", web::get().to(admin_categories::index))
                        .route("", web::post().to(admin_categories::store))
                        .route("/create", web::get().to(admin_categories::create))
                        .route("/{id}", web::put().to(admin_categories::update))
                        .route("/{id}", web::delete().to(admin_categories::destroy))
                        .route("/{id}/edit", web::get().to(admin_categories::edit)),
                )
                .route("/seo/generate", web::post().to(seo::generate))
                .route("/profile", web::get().to(profile::edit))
                .route("/profile/password", web::put().to(profile::update_password)),
        );
}
