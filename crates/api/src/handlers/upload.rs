//! Multipart parsing for the product create/update forms.
//!
//! Fields are buffered in memory. The `image` field must carry an `image/*`
//! content type and fit within the configured byte limit; unknown fields
//! are ignored.

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use stockroom_core::inventory::{
    is_image_content_type, ImageUpload, ProductForm, FIELD_CATEGORY_ID, FIELD_IMAGE, FIELD_NAME,
    FIELD_PRICE, FIELD_PRODUCT_ID, FIELD_STOCK_QUANTITY,
};

use crate::error::{AppError, AppResult};

/// Read every field of a product form.
pub async fn read_product_form(
    mut multipart: Multipart,
    max_image_bytes: usize,
) -> AppResult<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_image_bytes))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == FIELD_IMAGE {
            // A file input left empty arrives as a nameless, zero-byte part.
            if field.file_name().is_some_and(str::is_empty) {
                continue;
            }

            let content_type = field.content_type().unwrap_or("").to_string();
            if !is_image_content_type(&content_type) {
                return Err(AppError::InvalidFileType(format!(
                    "Only image files are allowed (got '{content_type}')"
                )));
            }

            let bytes = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, max_image_bytes))?;
            if bytes.len() > max_image_bytes {
                return Err(AppError::PayloadTooLarge(max_image_bytes));
            }

            form.image = Some(ImageUpload {
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let slot = match name.as_str() {
            FIELD_PRODUCT_ID => &mut form.product_id,
            FIELD_NAME => &mut form.name,
            FIELD_PRICE => &mut form.price,
            FIELD_STOCK_QUANTITY => &mut form.stock_quantity,
            FIELD_CATEGORY_ID => &mut form.category_id,
            _ => continue,
        };
        let text = field
            .text()
            .await
            .map_err(|e| multipart_error(e, max_image_bytes))?;
        *slot = Some(text);
    }

    Ok(form)
}

/// Map a multipart read failure; hitting the body limit surfaces as 413.
fn multipart_error(err: MultipartError, max_image_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(max_image_bytes)
    } else {
        AppError::BadRequest(err.body_text())
    }
}
