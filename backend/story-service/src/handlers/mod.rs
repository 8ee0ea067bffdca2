/// HTTP handlers for story-related endpoints
///
/// This module contains handlers for:
/// - Stories: Create and list ephemeral stories
/// - Upload: Multipart media upload
/// - Download: Token-gated paid downloads
/// - Identity: DigiLocker OAuth2 verification
pub mod download;
pub mod identity;
pub mod stories;
pub mod upload;

// Re-export handler functions at module level
pub use download::download_story;
pub use identity::{digilocker_callback, start_digilocker_verification};
pub use stories::{create_story, create_story_multipart, get_stories};
pub use upload::upload_media;

use actix_web::web;

/// Route table for the public API; shared by `main` and the integration
/// tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/stories")
                    .service(
                        web::resource("")
                            .route(web::get().to(get_stories))
                            .route(web::post().to(create_story)),
                    )
                    .route("/create", web::post().to(create_story_multipart))
                    .route("/upload", web::post().to(upload_media))
                    .route("/download", web::post().to(download_story)),
            )
            .service(
                web::resource("/auth/digilocker")
                    .route(web::post().to(start_digilocker_verification))
                    .route(web::get().to(digilocker_callback)),
            ),
    );
}
