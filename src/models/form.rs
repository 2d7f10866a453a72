use bytes::Bytes;
use rust_decimal::Decimal;
use std::fmt;

use crate::{
    error::{AppError, Result},
    models::ProductDraft,
    services::input_helpers::{format_colors, get_sizes, parse_decimal},
};

/// A photo picked by the operator, not yet decoded.
#[derive(Clone, PartialEq)]
pub struct ImageRef {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageRef")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    NameChanged(String),
    PriceChanged(String),
    CategoryChanged(String),
    DescriptionChanged(String),
    DiscountChanged(String),
    SizesChanged(String),
    ImagesPicked(Vec<ImageRef>),
    ColorPicked(u32),
    Reset,
}

/// Everything the operator has entered so far.
///
/// Text inputs are kept raw and only interpreted by [`FormState::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub name: String,
    pub price: String,
    pub category: String,
    pub description: String,
    pub discount_percentage: String,
    pub sizes: String,
    pub images: Vec<ImageRef>,
    pub colors: Vec<u32>,
}

impl FormState {
    pub fn apply(self, event: FormEvent) -> Self {
        match event {
            FormEvent::NameChanged(name) => Self { name, ..self },
            FormEvent::PriceChanged(price) => Self { price, ..self },
            FormEvent::CategoryChanged(category) => Self { category, ..self },
            FormEvent::DescriptionChanged(description) => Self {
                description,
                ..self
            },
            FormEvent::DiscountChanged(discount_percentage) => Self {
                discount_percentage,
                ..self
            },
            FormEvent::SizesChanged(sizes) => Self { sizes, ..self },
            FormEvent::ImagesPicked(picked) => {
                let mut images = self.images;
                images.extend(picked);
                Self { images, ..self }
            }
            FormEvent::ColorPicked(color) => {
                let mut colors = self.colors;
                colors.push(color);
                Self { colors, ..self }
            }
            FormEvent::Reset => Self::default(),
        }
    }

    pub fn selected_images_label(&self) -> String {
        self.images.len().to_string()
    }

    pub fn selected_colors_label(&self) -> String {
        format_colors(&self.colors)
    }

    /// Required inputs that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.price.trim().is_empty() {
            missing.push("price");
        }
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.category.trim().is_empty() {
            missing.push("category");
        }
        if self.images.is_empty() {
            missing.push("images");
        }
        missing
    }

    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn validate(&self) -> Result<ProductDraft> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Check the required fields: {}",
                missing.join(", ")
            )));
        }

        let price = parse_decimal("price", &self.price)?;
        if price.is_sign_negative() {
            return Err(AppError::ValidationError(
                "price must not be negative".to_string(),
            ));
        }

        let discount_percentage = match self.discount_percentage.trim() {
            "" => None,
            text => {
                let discount = parse_decimal("discount_percentage", text)?;
                if discount < Decimal::ZERO || discount > Decimal::ONE_HUNDRED {
                    return Err(AppError::ValidationError(
                        "discount_percentage must be between 0 and 100".to_string(),
                    ));
                }
                Some(discount)
            }
        };

        let description = match self.description.trim() {
            "" => None,
            text => Some(text.to_string()),
        };

        Ok(ProductDraft {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            price,
            discount_percentage,
            description,
            colors: (!self.colors.is_empty()).then(|| self.colors.clone()),
            sizes: get_sizes(&self.sizes),
        })
    }
}
