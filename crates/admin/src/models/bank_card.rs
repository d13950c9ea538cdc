//! Payment-card tokens

use serde::{Deserialize, Serialize};

/// A bank card in the pool. Only the masked number is ever shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankCard {
    pub id: i64,
    #[serde(default, rename = "card_number_masked")]
    pub masked_number: Option<String>,
    #[serde(default)]
    pub used_count: Option<u32>,
    #[serde(default)]
    pub max_use_count: Option<u32>,
    #[serde(default)]
    pub remark: Option<String>,
}

impl BankCard {
    pub fn usage(&self) -> String {
        format!(
            "{}/{}",
            self.used_count.unwrap_or(0),
            self.max_use_count.unwrap_or(1)
        )
    }
}

/// Payload for `POST /api/bank-cards`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBankCard {
    pub card_number_masked: String,
    pub card_data: String,
    pub max_use_count: u32,
    pub remark: String,
}

impl NewBankCard {
    /// A card entered by its masked number; the same text is stored as card data
    pub fn masked(number: impl Into<String>, max_use_count: u32, remark: impl Into<String>) -> Self {
        let number = number.into();
        Self {
            card_data: number.clone(),
            card_number_masked: number,
            max_use_count: max_use_count.max(1),
            remark: remark.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_name_for_masked_number() {
        let card: BankCard = serde_json::from_str(
            r#"{"id":4,"card_number_masked":"****1234","used_count":1,"max_use_count":2}"#,
        )
        .unwrap();
        assert_eq!(card.masked_number.as_deref(), Some("****1234"));
        assert_eq!(card.usage(), "1/2");
    }

    #[test]
    fn test_new_card_mirrors_masked_number() {
        let card = NewBankCard::masked("****9999", 0, "");
        assert_eq!(card.card_data, "****9999");
        assert_eq!(card.max_use_count, 1);
    }
}
