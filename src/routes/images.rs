use actix_web::{get, http::header, web, HttpResponse, Responder};

use crate::{error::AppError, storage::CoverImageStore};

/// Serves a stored book cover. Public, like any static asset.
#[get("/bookcoverimages/{file_name}")]
pub async fn get_cover(
    images: web::Data<CoverImageStore>,
    file_name: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let file_name = file_name.into_inner();
    match images.read(&file_name).await? {
        Some((bytes, mime)) => Ok(HttpResponse::Ok()
            .content_type(mime.to_string())
            .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
            .body(bytes)),
        None => Err(AppError::NotFound("Image not found".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use base64::{engine::general_purpose::STANDARD, Engine};

    #[actix_rt::test]
    async fn test_get_cover() {
        let dir = tempfile::tempdir().unwrap();
        let store = CoverImageStore::new(dir.path());
        let public_path = store
            .save(&STANDARD.encode(b"GIF89a"), Some("cover.gif"))
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(store))
                .service(get_cover),
        )
        .await;

        let req = test::TestRequest::get().uri(&public_path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/gif"
        );
        assert_eq!(test::read_body(resp).await, "GIF89a".as_bytes());

        let req = test::TestRequest::get()
            .uri("/bookcoverimages/missing.png")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
