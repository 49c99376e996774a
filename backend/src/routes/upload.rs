//! Multipart form parsing for the photo-carrying endpoints

use crate::error::ApiError;
use crate::services::tobacco::ProductInput;
use axum::extract::Multipart;
use uuid::Uuid;

/// Read a catalog product form: `name`, `fabricatorId`, `description`
/// and an optional `photo` file part.
pub async fn read_product_form(mut multipart: Multipart) -> Result<ProductInput, ApiError> {
    let mut name = None;
    let mut fabricator_id = None;
    let mut description = None;
    let mut photo = None;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = Some(field.text().await.map_err(malformed)?),
            "fabricatorId" => {
                let raw = field.text().await.map_err(malformed)?;
                let id = raw.parse::<Uuid>().map_err(|_| {
                    ApiError::Validation("fabricatorId must be a valid id".to_string())
                })?;
                fabricator_id = Some(id);
            }
            "description" => description = Some(field.text().await.map_err(malformed)?),
            "photo" => photo = read_file_part(field).await?,
            _ => {}
        }
    }

    Ok(ProductInput {
        name: require(name, "name")?,
        fabricator_id: require(fabricator_id, "fabricatorId")?,
        description: require(description, "description")?,
        photo,
    })
}

/// Read a bare `photo` file part (avatar upload)
pub async fn read_photo(mut multipart: Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() == Some("photo") {
            if let Some(photo) = read_file_part(field).await? {
                return Ok(photo);
            }
        }
    }
    Err(ApiError::Validation(
        "Photo is missing or has an unsupported format".to_string(),
    ))
}

async fn read_file_part(
    field: axum::extract::multipart::Field<'_>,
) -> Result<Option<(String, Vec<u8>)>, ApiError> {
    let Some(file_name) = field.file_name().map(str::to_string) else {
        return Ok(None);
    };
    let bytes = field.bytes().await.map_err(malformed)?;
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some((file_name, bytes.to_vec())))
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::Validation(format!("{} is missing", field)))
}

fn malformed(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Malformed multipart body: {}", err))
}
