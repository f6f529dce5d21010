//! Newtype IDs for type-safe catalog references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// Catalog markup carries these IDs as plain strings (`data-id="b1"`), so
/// the wrapper does no validation of its own.
///
/// # Example
///
/// ```rust
/// # use suresh_core::define_id;
/// define_id!(ProductCode);
/// define_id!(BrandCode);
///
/// let product = ProductCode::new("b1");
/// let brand = BrandCode::new("b1");
///
/// // These are different types, so this won't compile:
/// // let _: ProductCode = brand;
/// assert_eq!(product.as_str(), brand.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_display() {
        let id = ProductId::new("b1");
        assert_eq!(id.to_string(), "b1");
        assert_eq!(id.as_str(), "b1");
    }

    #[test]
    fn test_product_id_serializes_as_plain_string() {
        let id = ProductId::from("helmet-85");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"helmet-85\"");

        let parsed: ProductId = serde_json::from_str("\"helmet-85\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_category_id_into_inner() {
        let category = CategoryId::from(String::from("road"));
        assert_eq!(category.into_inner(), "road");
    }
}
