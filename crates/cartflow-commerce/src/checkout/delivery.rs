//! Delivery information captured on an order.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// Delivery details captured as plain strings at order time, not linked to
/// the customer profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DeliveryInfo {
    /// Recipient full name.
    pub full_name: String,
    /// Delivery address.
    pub address: String,
    /// Contact phone number.
    pub phone: String,
}

impl DeliveryInfo {
    /// Create delivery info from its parts.
    pub fn new(
        full_name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            address: address.into(),
            phone: phone.into(),
        }
    }

    /// Validate that every field is present and non-blank.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.full_name.trim().is_empty() {
            return Err(CommerceError::InvalidDelivery("full name"));
        }
        if self.address.trim().is_empty() {
            return Err(CommerceError::InvalidDelivery("address"));
        }
        if self.phone.trim().is_empty() {
            return Err(CommerceError::InvalidDelivery("phone number"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_delivery_info() {
        let info = DeliveryInfo::new("Jane Doe", "1 Main St", "555-0100");
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_blank_fields_rejected() {
        let info = DeliveryInfo::new("  ", "1 Main St", "555-0100");
        assert_eq!(
            info.validate(),
            Err(CommerceError::InvalidDelivery("full name"))
        );

        let info = DeliveryInfo::new("Jane Doe", "", "555-0100");
        assert_eq!(
            info.validate(),
            Err(CommerceError::InvalidDelivery("address"))
        );

        let info = DeliveryInfo::new("Jane Doe", "1 Main St", "");
        assert_eq!(
            info.validate(),
            Err(CommerceError::InvalidDelivery("phone number"))
        );
    }
}
