use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};

/// A catalog row. `available == false` marks a soft-deleted product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateProductDto {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(range(min = 0.0))]
    pub price: f64,
    #[garde(skip)]
    #[serde(default)]
    pub description: Option<String>,
    #[garde(skip)]
    #[serde(default = "default_available")]
    pub available: bool,
}

/// Partial update addressed by `id`; the id itself is never written.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct UpdateProductDto {
    #[garde(skip)]
    pub id: i64,
    #[garde(length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[garde(range(min = 0.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[garde(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[garde(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl UpdateProductDto {
    /// Split into the addressed id and the fields to change.
    pub fn into_parts(self) -> (i64, ProductChanges) {
        (
            self.id,
            ProductChanges {
                name: self.name,
                price: self.price,
                description: self.description,
                available: self.available,
            },
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProductIdDto {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidateProductsDto {
    pub ids: Vec<i64>,
}

/// Values for a new row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub available: bool,
}

impl From<CreateProductDto> for NewProduct {
    fn from(dto: CreateProductDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            price: dto.price,
            available: dto.available,
        }
    }
}

/// Column changes for an update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub available: Option<bool>,
}

impl ProductChanges {
    pub fn soft_delete() -> Self {
        Self {
            available: Some(false),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_defaults_to_available() {
        let dto: CreateProductDto = serde_json::from_value(json!({"name": "A", "price": 10})).unwrap();
        assert!(dto.available);
        assert_eq!(dto.description, None);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn create_rejects_empty_name_and_negative_price() {
        let dto = CreateProductDto {
            name: String::new(),
            price: -1.0,
            description: None,
            available: true,
        };
        let report = dto.validate().unwrap_err().to_string();
        assert!(report.contains("name"));
        assert!(report.contains("price"));
    }

    #[test]
    fn update_splits_id_from_changes() {
        let dto: UpdateProductDto =
            serde_json::from_value(json!({"id": 4, "price": 2.5})).unwrap();
        let (id, changes) = dto.into_parts();
        assert_eq!(id, 4);
        assert_eq!(
            changes,
            ProductChanges {
                price: Some(2.5),
                ..ProductChanges::default()
            }
        );
    }

    #[test]
    fn product_serializes_camel_case() {
        let now = Utc::now();
        let product = Product {
            id: 1,
            name: "A".into(),
            description: None,
            price: 10.0,
            available: true,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&product).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("created_at").is_none());
    }
}
