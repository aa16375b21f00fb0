use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single date the checkout can offer for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDate {
    /// Calendar date, serialized as `YYYY-MM-DD`
    #[schema(value_type = String, example = "2026-10-19")]
    pub date: NaiveDate,
    /// Localized label shown to the customer, e.g. "maandag 19 okt"
    pub display_name: String,
}
