use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Collection the product documents are added to.
pub const PRODUCTS_COLLECTION: &str = "products";

/// A product listing as written to the document store.
///
/// Built once, right before the write, from a validated form and the URLs of
/// the uploaded photos. Optional fields are left out of the document when
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_percentage: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Packed ARGB values, in pick order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    pub image_urls: Vec<String>,
}

/// Validated scalar fields of a product, before any photo is uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub discount_percentage: Option<Decimal>,
    pub description: Option<String>,
    pub colors: Option<Vec<u32>>,
    pub sizes: Option<Vec<String>>,
}

impl ProductDraft {
    pub fn into_product(self, id: String, image_urls: Vec<String>) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            discount_percentage: self.discount_percentage,
            description: self.description,
            colors: self.colors,
            sizes: self.sizes,
            image_urls,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    pub message: String,
    pub product: Product,
}
