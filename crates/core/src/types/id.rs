//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Error returned when an ID cannot be parsed from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid id: {0:?}")]
pub struct ParseIdError(pub String);

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>`, `Into<i32>` and `FromStr` implementations
///
/// # Example
///
/// ```rust
/// # use dessert_cart_core::define_id;
/// define_id!(ProductId);
/// define_id!(CategoryId);
///
/// let product_id = ProductId::new(1);
/// let category_id = CategoryId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = category_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::ParseIdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim()
                    .parse::<i32>()
                    .map(Self)
                    .map_err(|_| $crate::types::id::ParseIdError(s.to_string()))
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_parses_data_attribute_text() {
        assert_eq!("7".parse::<ProductId>().unwrap(), ProductId::new(7));
        assert_eq!(" 12 ".parse::<ProductId>().unwrap(), ProductId::new(12));
    }

    #[test]
    fn test_product_id_rejects_garbage() {
        let err = "waffle".parse::<ProductId>().unwrap_err();
        assert_eq!(err, ParseIdError("waffle".to_string()));
        assert!("".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_product_id_serde_is_transparent() {
        let id: ProductId = serde_json::from_str("3").unwrap();
        assert_eq!(id.as_i32(), 3);
        assert_eq!(serde_json::to_string(&id).unwrap(), "3");
    }
}
