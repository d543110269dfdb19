//! Type-prefixed, zero-padded entity identifiers.
//!
//! Every collection uses its own prefix and minimum digit width
//! (`SUP0001`, `ST0001`, `PRD00001`, `SL000001`, ...). Sequences start at 1
//! and are never reused within a dataset.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $width:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub const PREFIX: &'static str = $prefix;
            pub const WIDTH: usize = $width;

            /// Builds the identifier for a 1-based sequence number.
            pub fn from_sequence(sequence: usize) -> Self {
                Self(format!("{}{:0width$}", $prefix, sequence, width = $width))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_well_formed(&self) -> bool {
                is_well_formed(&self.0, $prefix, $width)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

entity_id!(SupplierId, "SUP", 4);
entity_id!(StoreId, "ST", 4);
entity_id!(ProductId, "PRD", 5);
entity_id!(CustomerId, "CUS", 5);
entity_id!(EmployeeId, "EMP", 4);
entity_id!(SaleId, "SL", 6);
entity_id!(InventoryId, "INV", 6);
entity_id!(ReturnId, "RET", 5);
entity_id!(FootfallId, "FT", 5);
entity_id!(
    /// Marketing campaign identifier.
    CampaignId,
    "MKT",
    4
);
entity_id!(FinanceId, "FIN", 4);

fn is_well_formed(value: &str, prefix: &str, width: usize) -> bool {
    let Some(digits) = value.strip_prefix(prefix) else {
        return false;
    };
    digits.len() >= width
        && digits.bytes().all(|byte| byte.is_ascii_digit())
        && digits.bytes().any(|byte| byte != b'0')
}

#[cfg(test)]
mod tests {
    use super::{ProductId, SaleId, StoreId, SupplierId};

    #[test]
    fn sequence_ids_are_prefixed_and_zero_padded() {
        assert_eq!(SupplierId::from_sequence(1).as_str(), "SUP0001");
        assert_eq!(StoreId::from_sequence(42).as_str(), "ST0042");
        assert_eq!(ProductId::from_sequence(1500).as_str(), "PRD01500");
        assert_eq!(SaleId::from_sequence(2000).as_str(), "SL002000");
    }

    #[test]
    fn overflowing_sequences_keep_every_digit() {
        let id = SupplierId::from_sequence(12345);
        assert_eq!(id.as_str(), "SUP12345");
        assert!(id.is_well_formed());
    }

    #[test]
    fn malformed_ids_are_rejected() {
        assert!(!StoreId::from("SUP0001").is_well_formed());
        assert!(!StoreId::from("ST01").is_well_formed());
        assert!(!StoreId::from("ST0000").is_well_formed());
        assert!(!StoreId::from("ST00a1").is_well_formed());
        assert!(StoreId::from("ST0001").is_well_formed());
    }
}
