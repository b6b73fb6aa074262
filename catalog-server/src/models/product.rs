//! Product record and the input shapes that create or change it
//!
//! Inbound shapes (`ProductCreate`, `ProductUpdate`) are plain serde types.
//! They are validated into `NewProduct` / `ProductChanges` before any
//! storage backend sees them.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use super::ValidationError;

/// Maximum length for product names (matches the column width)
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length for product descriptions
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Persisted product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

/// Validated product name: trimmed, non-empty, at most 100 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductName(String);

impl ProductName {
    /// Create a product name, trimming surrounding whitespace.
    ///
    /// # Example
    /// ```
    /// use catalog_server::models::ProductName;
    ///
    /// assert_eq!(ProductName::new("  Lamp ").unwrap().as_str(), "Lamp");
    /// assert!(ProductName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_NAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

fn validate_price(price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ValidationError::NotPositive { field: "price" });
    }
    Ok(price)
}

fn validate_description(description: String) -> Result<String, ValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description",
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(description)
}

/// Body of `POST /products`
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
}

/// Validated product ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub description: Option<String>,
    pub price: f64,
}

impl TryFrom<ProductCreate> for NewProduct {
    type Error = ValidationError;

    fn try_from(input: ProductCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            name: ProductName::new(&input.name)?,
            description: input.description.map(validate_description).transpose()?,
            price: validate_price(input.price)?,
        })
    }
}

/// Body of `PUT /products/{id}`.
///
/// Each field is `None` when absent from the body and `Some(None)` when
/// sent as an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Option<f64>>,
}

/// Marks a field as present, keeping an inner `null` as `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Validated partial update.
///
/// Explicit nulls survive validation; the store rejects them for
/// required columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<Option<ProductName>>,
    pub description: Option<Option<String>>,
    pub price: Option<Option<f64>>,
}

impl ProductChanges {
    /// True when the update touches no column.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none()
    }

    /// The new name, if this update sets one.
    pub fn new_name(&self) -> Option<&str> {
        self.name.as_ref()?.as_ref().map(ProductName::as_str)
    }
}

impl TryFrom<ProductUpdate> for ProductChanges {
    type Error = ValidationError;

    fn try_from(input: ProductUpdate) -> Result<Self, Self::Error> {
        let name = match input.name {
            Some(Some(name)) => Some(Some(ProductName::new(&name)?)),
            Some(None) => Some(None),
            None => None,
        };

        let description = match input.description {
            Some(Some(description)) => Some(Some(validate_description(description)?)),
            other => other,
        };

        let price = match input.price {
            Some(Some(price)) => Some(Some(validate_price(price)?)),
            other => other,
        };

        Ok(Self {
            name,
            description,
            price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, price: f64) -> ProductCreate {
        ProductCreate {
            name: name.into(),
            description: None,
            price,
        }
    }

    #[test]
    fn trims_name() {
        let product = NewProduct::try_from(create("  Desk lamp  ", 19.99)).unwrap();
        assert_eq!(product.name.as_str(), "Desk lamp");
    }

    #[test]
    fn rejects_blank_name() {
        let err = NewProduct::try_from(create("   ", 1.0)).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "name" });

        let err = NewProduct::try_from(create("", 1.0)).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "name" });
    }

    #[test]
    fn rejects_long_name() {
        let name = "n".repeat(MAX_NAME_LEN + 1);
        let err = NewProduct::try_from(create(&name, 1.0)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 100, .. }));

        let name = "n".repeat(MAX_NAME_LEN);
        assert!(NewProduct::try_from(create(&name, 1.0)).is_ok());
    }

    #[test]
    fn rejects_non_positive_price() {
        for price in [0.0, -10.99, f64::NAN, f64::INFINITY] {
            let err = NewProduct::try_from(create("Widget", price)).unwrap_err();
            assert_eq!(err, ValidationError::NotPositive { field: "price" });
        }
    }

    #[test]
    fn rejects_long_description() {
        let input = ProductCreate {
            name: "Widget".into(),
            description: Some("d".repeat(MAX_DESCRIPTION_LEN + 1)),
            price: 2.5,
        };
        let err = NewProduct::try_from(input).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TooLong {
                field: "description",
                ..
            }
        ));
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let update: ProductUpdate =
            serde_json::from_str(r#"{"name": null, "price": 3.5}"#).unwrap();
        assert_eq!(update.name, Some(None));
        assert_eq!(update.description, None);
        assert_eq!(update.price, Some(Some(3.5)));
    }

    #[test]
    fn empty_update_body() {
        let update: ProductUpdate = serde_json::from_str("{}").unwrap();
        let changes = ProductChanges::try_from(update).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn update_validates_present_fields() {
        let update: ProductUpdate = serde_json::from_str(r#"{"price": -5}"#).unwrap();
        let err = ProductChanges::try_from(update).unwrap_err();
        assert_eq!(err, ValidationError::NotPositive { field: "price" });

        let update: ProductUpdate = serde_json::from_str(r#"{"name": "  "}"#).unwrap();
        let err = ProductChanges::try_from(update).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "name" });
    }

    #[test]
    fn update_passes_nulls_through() {
        let update: ProductUpdate =
            serde_json::from_str(r#"{"name": null, "description": null, "price": null}"#)
                .unwrap();
        let changes = ProductChanges::try_from(update).unwrap();
        assert_eq!(changes.name, Some(None));
        assert_eq!(changes.description, Some(None));
        assert_eq!(changes.price, Some(None));
        assert_eq!(changes.new_name(), None);
    }

    #[test]
    fn new_name_is_trimmed() {
        let update: ProductUpdate = serde_json::from_str(r#"{"name": " Lamp "}"#).unwrap();
        let changes = ProductChanges::try_from(update).unwrap();
        assert_eq!(changes.new_name(), Some("Lamp"));
    }
}
