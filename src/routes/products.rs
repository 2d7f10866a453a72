use axum::{
    Extension, Json,
    extract::{
        Multipart, State,
        multipart::{Field, MultipartError},
    },
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CreateProductResponse, FormEvent, FormState, ImageRef},
    services::input_helpers::parse_color,
    utils::jwt::Claims,
};

pub async fn create_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreateProductResponse>)> {
    let mut form = FormState::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_body)? {
        for event in field_events(field).await? {
            form = form.apply(event);
        }
    }

    tracing::info!(
        operator = %claims.sub,
        images = %form.selected_images_label(),
        colors = %form.selected_colors_label(),
        "Product submission received"
    );

    let product = state.submissions.submit(form).await.result?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            message: "Product added successfully".to_string(),
            product,
        }),
    ))
}

async fn field_events(field: Field<'_>) -> Result<Vec<FormEvent>> {
    let name = field.name().unwrap_or_default().to_string();

    let event = match name.as_str() {
        "name" => FormEvent::NameChanged(field.text().await.map_err(invalid_body)?),
        "price" => FormEvent::PriceChanged(field.text().await.map_err(invalid_body)?),
        "category" => FormEvent::CategoryChanged(field.text().await.map_err(invalid_body)?),
        "description" => FormEvent::DescriptionChanged(field.text().await.map_err(invalid_body)?),
        "discount_percentage" | "offer_percentage" => {
            FormEvent::DiscountChanged(field.text().await.map_err(invalid_body)?)
        }
        "sizes" => FormEvent::SizesChanged(field.text().await.map_err(invalid_body)?),
        "color" | "colors" => {
            let text = field.text().await.map_err(invalid_body)?;
            return text
                .split(',')
                .filter(|value| !value.trim().is_empty())
                .map(|value| parse_color(value).map(FormEvent::ColorPicked))
                .collect();
        }
        "images" | "images[]" => {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.map_err(invalid_body)?;

            if data.is_empty() {
                return Ok(Vec::new());
            }

            FormEvent::ImagesPicked(vec![ImageRef {
                file_name,
                content_type,
                data,
            }])
        }
        other => {
            tracing::debug!(field = other, "Ignoring unknown form field");
            return Ok(Vec::new());
        }
    };

    Ok(vec![event])
}

fn invalid_body(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
}
