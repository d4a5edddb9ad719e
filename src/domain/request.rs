use crate::domain::response::Device;
use crate::domain::value::{OfferCode, ResourceId};

/// Tariff switch for one device.
///
/// Built from a freshly fetched [`Device`] so the product id and resource
/// identifier are sent back exactly as the portal reported them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOffer {
    current_product_id: i64,
    offer_code: OfferCode,
    resource_id: ResourceId,
    disabling_autoprolong: bool,
}

impl ChangeOffer {
    pub fn for_device(device: &Device, offer_code: OfferCode) -> Self {
        Self {
            current_product_id: device.product.product_id,
            offer_code,
            resource_id: device.resource_id.clone(),
            disabling_autoprolong: false,
        }
    }

    pub fn current_product_id(&self) -> i64 {
        self.current_product_id
    }

    pub fn offer_code(&self) -> &OfferCode {
        &self.offer_code
    }

    pub fn resource_id(&self) -> &ResourceId {
        &self.resource_id
    }

    pub fn disabling_autoprolong(&self) -> bool {
        self.disabling_autoprolong
    }
}
