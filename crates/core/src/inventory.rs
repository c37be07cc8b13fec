//! Product form rules: required fields, numeric parsing, image constraints,
//! media key derivation and the new-arrivals window.
//!
//! Handlers collect raw multipart text into a [`ProductForm`] and convert it
//! with [`ProductForm::into_new_product`] (create) or
//! [`ProductForm::into_patch`] (update). Both keep field names in the wire
//! format (`stockQuantity`, `categoryId`) so error payloads match what the
//! client sent.

use chrono::Months;

use crate::error::CoreError;
use crate::types::{DbId, ProductId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest accepted image upload (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Media host folder product images are uploaded into.
pub const DEFAULT_MEDIA_FOLDER: &str = "products";

/// How far back `GET /newArrivals` looks, in calendar months.
pub const NEW_ARRIVAL_WINDOW_MONTHS: u32 = 2;

pub const FIELD_NAME: &str = "name";
pub const FIELD_PRICE: &str = "price";
pub const FIELD_STOCK_QUANTITY: &str = "stockQuantity";
pub const FIELD_CATEGORY_ID: &str = "categoryId";
pub const FIELD_PRODUCT_ID: &str = "productId";
pub const FIELD_IMAGE: &str = "image";

// ---------------------------------------------------------------------------
// Form types
// ---------------------------------------------------------------------------

/// An image file received from a client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Raw product form values as received. Text fields are untrimmed.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
    pub stock_quantity: Option<String>,
    pub category_id: Option<String>,
    pub image: Option<ImageUpload>,
}

/// A fully validated create request.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock_quantity: i32,
    pub category_id: DbId,
    pub image: ImageUpload,
}

/// A validated update request. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock_quantity: Option<i32>,
    pub category_id: Option<DbId>,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    /// Names of required create fields that are absent or blank, in a
    /// stable order.
    pub fn missing_fields(&self) -> Vec<String> {
        let text = [
            (FIELD_NAME, &self.name),
            (FIELD_PRICE, &self.price),
            (FIELD_STOCK_QUANTITY, &self.stock_quantity),
            (FIELD_CATEGORY_ID, &self.category_id),
        ];

        let mut missing: Vec<String> = text
            .iter()
            .filter(|(_, value)| blank(value.as_deref()))
            .map(|(field, _)| field.to_string())
            .collect();

        if !self.image.as_ref().is_some_and(|img| !img.bytes.is_empty()) {
            missing.push(FIELD_IMAGE.to_string());
        }
        missing
    }

    /// Validate a create form. Every required field must be present.
    pub fn into_new_product(self) -> Result<NewProduct, CoreError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CoreError::MissingFields(missing));
        }

        let id = match non_blank(self.product_id.as_deref()) {
            Some(raw) => parse_product_id(raw)?,
            None => ProductId::new_v4(),
        };

        // `missing_fields` guarantees these are present.
        let name = non_blank(self.name.as_deref()).unwrap_or_default().to_string();
        let price = parse_price(self.price.as_deref().unwrap_or_default())?;
        let stock_quantity = parse_stock(self.stock_quantity.as_deref().unwrap_or_default())?;
        let category_id = parse_category_id(self.category_id.as_deref().unwrap_or_default())?;
        let image = self
            .image
            .ok_or_else(|| CoreError::MissingFields(vec![FIELD_IMAGE.to_string()]))?;

        Ok(NewProduct {
            id,
            name,
            price,
            stock_quantity,
            category_id,
            image,
        })
    }

    /// Validate an update form. Blank text fields count as absent.
    pub fn into_patch(self) -> Result<ProductPatch, CoreError> {
        Ok(ProductPatch {
            name: non_blank(self.name.as_deref()).map(str::to_string),
            price: non_blank(self.price.as_deref()).map(parse_price).transpose()?,
            stock_quantity: non_blank(self.stock_quantity.as_deref())
                .map(parse_stock)
                .transpose()?,
            category_id: non_blank(self.category_id.as_deref())
                .map(parse_category_id)
                .transpose()?,
            image: self.image.filter(|img| !img.bytes.is_empty()),
        })
    }
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

fn blank(value: Option<&str>) -> bool {
    non_blank(value).is_none()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a non-negative, finite price.
pub fn parse_price(raw: &str) -> Result<f64, CoreError> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::Validation(format!("'{FIELD_PRICE}' must be a number")))?;
    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::Validation(format!(
            "'{FIELD_PRICE}' must be a non-negative number"
        )));
    }
    Ok(price)
}

/// Parse a non-negative stock count.
pub fn parse_stock(raw: &str) -> Result<i32, CoreError> {
    let stock: i32 = raw.trim().parse().map_err(|_| {
        CoreError::Validation(format!("'{FIELD_STOCK_QUANTITY}' must be an integer"))
    })?;
    if stock < 0 {
        return Err(CoreError::Validation(format!(
            "'{FIELD_STOCK_QUANTITY}' must not be negative"
        )));
    }
    Ok(stock)
}

pub fn parse_category_id(raw: &str) -> Result<DbId, CoreError> {
    raw.trim()
        .parse()
        .map_err(|_| CoreError::Validation(format!("'{FIELD_CATEGORY_ID}' must be an integer id")))
}

pub fn parse_product_id(raw: &str) -> Result<ProductId, CoreError> {
    ProductId::parse_str(raw.trim())
        .map_err(|_| CoreError::Validation(format!("'{FIELD_PRODUCT_ID}' must be a UUID")))
}

// ---------------------------------------------------------------------------
// Images and media keys
// ---------------------------------------------------------------------------

/// Whether a multipart content type names an image (`image/*`).
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().to_ascii_lowercase())
        .is_some_and(|essence| {
            essence
                .strip_prefix("image/")
                .is_some_and(|subtype| !subtype.is_empty())
        })
}

/// Derive a media storage key from a hosted image URL: the last path
/// segment with its file extension removed.
///
/// Returns `None` when the URL has no usable final segment.
///
/// ```
/// use stockroom_core::inventory::media_key_from_url;
///
/// assert_eq!(
///     media_key_from_url("https://res.example.com/demo/image/upload/v17/products/abc123.jpg"),
///     Some("abc123".to_string()),
/// );
/// assert_eq!(media_key_from_url("https://res.example.com/"), None);
/// ```
pub fn media_key_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next()?.trim();
    let key = match segment.rfind('.') {
        Some(0) | None => segment,
        Some(dot) => &segment[..dot],
    };
    (!key.is_empty()).then(|| key.to_string())
}

/// Folder a hosted image lives in: the path segments between the version
/// marker (`v<digits>`) and the file name.
///
/// Returns `None` when the URL carries no version marker or no folder.
pub fn media_folder_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let path = path.split_once("://").map_or(path, |(_, rest)| rest);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let start = segments.iter().position(|s| is_version_segment(s))? + 1;
    let end = segments.len() - 1;
    (start < end).then(|| segments[start..end].join("/"))
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

// ---------------------------------------------------------------------------
// New arrivals
// ---------------------------------------------------------------------------

/// Earliest creation time that still counts as a new arrival.
pub fn new_arrivals_cutoff(now: Timestamp) -> Timestamp {
    now.checked_sub_months(Months::new(NEW_ARRIVAL_WINDOW_MONTHS))
        .unwrap_or(now)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
