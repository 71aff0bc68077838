//! Strongly-typed identifiers used across the domain.
//!
//! Northwind tables use integer surrogate keys; each entity gets its own
//! newtype so a `CategoryId` can never be passed where a `SupplierId` is
//! expected.

/// Declare an integer-backed entity identifier.
///
/// The generated type is `Copy`, ordered (stores return rows ordered by key),
/// serializes transparently and parses from its decimal form.
///
/// Crates using this macro must depend on `serde`.
#[macro_export]
macro_rules! entity_id {
    ($(#[$meta:meta])* $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $t(pub i64);

        impl $t {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl core::str::FromStr for $t {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|e| $crate::DomainError::invalid_id(format!("{}: {}", $name, e)))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::DomainError;

    entity_id!(
        /// Identifier used only by these tests.
        WidgetId,
        "WidgetId"
    );

    #[test]
    fn parses_and_displays_decimal_form() {
        let id: WidgetId = " 42 ".parse().unwrap();
        assert_eq!(id, WidgetId::new(42));
        assert_eq!(id.to_string(), "42");
        assert_eq!(i64::from(id), 42);
    }

    #[test]
    fn rejects_non_numeric_input() {
        let err = "ALFKI".parse::<WidgetId>().unwrap_err();
        match err {
            DomainError::InvalidId(msg) => assert!(msg.starts_with("WidgetId:")),
            other => panic!("Expected InvalidId, got {other:?}"),
        }
    }

    #[test]
    fn ids_order_by_key() {
        let mut ids = vec![WidgetId(3), WidgetId(1), WidgetId(2)];
        ids.sort();
        assert_eq!(ids, vec![WidgetId(1), WidgetId(2), WidgetId(3)]);
    }
}
