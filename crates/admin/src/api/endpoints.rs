//! Typed wrappers over the backend contract

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use super::client::{RequestOptions, SessionClient};
use super::wire::{
    AddedResponse, BalanceResponse, FetchMailResponse, GetNumbersResponse, LogPage,
    MailListResponse, OpenAiAvailability, Page, ServicesResponse, SmsCodeResponse, StockResponse,
};
use super::ApiError;
use crate::models::{DashboardStats, Mailbox, NewBankCard, NewMailbox, NewPhone, Settings};

/// Append `pairs` to `path` as a query string. Empty values are skipped.
pub fn with_query(path: &str, pairs: &[(&str, &str)]) -> String {
    let query: Vec<String> = pairs
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query.join("&"))
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

impl SessionClient {
    /// Fetch one page of a list endpoint. `path` carries the query string.
    pub fn list_page<T: DeserializeOwned>(&self, path: &str) -> Result<Page<T>, ApiError> {
        self.get_json(path)
    }

    // Mailboxes

    pub fn create_mailbox(&self, mailbox: &NewMailbox) -> Result<(), ApiError> {
        self.send("/api/emails", RequestOptions::post(to_body(mailbox)?))
    }

    pub fn delete_mailbox(&self, id: i64) -> Result<(), ApiError> {
        self.send(&format!("/api/emails/{}", id), RequestOptions::delete())
    }

    pub fn import_mailboxes(&self, lines: &str) -> Result<AddedResponse, ApiError> {
        self.batch_import("/api/emails/batch-import", lines)
    }

    /// Every mailbox including credentials, for the export file
    pub fn export_mailboxes(&self) -> Result<Vec<Mailbox>, ApiError> {
        let page: Page<Mailbox> = self.get_json("/api/emails/export")?;
        Ok(page.items)
    }

    // Bank cards

    pub fn create_bank_card(&self, card: &NewBankCard) -> Result<(), ApiError> {
        self.send("/api/bank-cards", RequestOptions::post(to_body(card)?))
    }

    pub fn delete_bank_card(&self, id: i64) -> Result<(), ApiError> {
        self.send(&format!("/api/bank-cards/{}", id), RequestOptions::delete())
    }

    pub fn import_bank_cards(&self, lines: &str) -> Result<AddedResponse, ApiError> {
        self.batch_import("/api/bank-cards/batch-import", lines)
    }

    pub fn batch_delete_bank_cards(&self, ids: &[i64]) -> Result<(), ApiError> {
        self.send(
            "/api/bank-cards/batch-delete",
            RequestOptions::post(json!({ "ids": ids })),
        )
    }

    // Phones

    pub fn create_phone(&self, phone: &NewPhone) -> Result<(), ApiError> {
        self.send("/api/phones", RequestOptions::post(to_body(phone)?))
    }

    pub fn delete_phone(&self, id: i64) -> Result<(), ApiError> {
        self.send(&format!("/api/phones/{}", id), RequestOptions::delete())
    }

    /// Cancel the number at the SMS provider and drop it from the pool
    pub fn release_phone(&self, id: i64) -> Result<(), ApiError> {
        self.send(
            &format!("/api/phones/{}/release", id),
            RequestOptions::post_empty(),
        )
    }

    pub fn import_phones(&self, lines: &str) -> Result<AddedResponse, ApiError> {
        self.batch_import("/api/phones/batch-import", lines)
    }

    pub fn batch_delete_phones(&self, ids: &[i64]) -> Result<(), ApiError> {
        self.send(
            "/api/phones/batch-delete",
            RequestOptions::post(json!({ "ids": ids })),
        )
    }

    pub fn phone_sms_code(&self, id: i64) -> Result<SmsCodeResponse, ApiError> {
        self.get_json(&format!("/api/phones/{}/sms-code", id))
    }

    // Accounts

    /// CSV export of the accounts matching `filters`
    pub fn export_accounts(&self, filters: &[(&str, &str)]) -> Result<Vec<u8>, ApiError> {
        self.request_bytes(
            &with_query("/api/accounts/export", filters),
            RequestOptions::get(),
        )
    }

    // Email provider

    pub fn email_balance(&self) -> Result<BalanceResponse, ApiError> {
        self.get_json("/api/email-api/balance")
    }

    pub fn mail_list(&self, email_id: i64) -> Result<MailListResponse, ApiError> {
        self.get_json(&format!("/api/email-api/mail-list?email_id={}", email_id))
    }

    /// Stock for `mail_type`. An empty type asks for every type.
    pub fn mail_stock(&self, mail_type: &str) -> Result<StockResponse, ApiError> {
        self.get_json(&format!(
            "/api/email-api/stock?mailType={}",
            urlencoding::encode(mail_type)
        ))
    }

    /// Buy `quantity` mailboxes and import them into the pool
    pub fn fetch_mail(&self, mail_type: &str, quantity: u32) -> Result<FetchMailResponse, ApiError> {
        self.request_json(
            "/api/email-api/fetch-mail",
            RequestOptions::post(json!({
                "mail_type": mail_type,
                "quantity": quantity,
                "import_to_emails": true,
            })),
        )
    }

    // SMS provider

    pub fn sms_balance(&self) -> Result<BalanceResponse, ApiError> {
        self.get_json("/api/sms-api/balance")
    }

    /// Balance and OpenAI stock. `debug` adds the provider's raw price table.
    pub fn openai_availability(&self, debug: bool) -> Result<OpenAiAvailability, ApiError> {
        let path = if debug {
            "/api/sms-api/openai-availability?debug=1"
        } else {
            "/api/sms-api/openai-availability"
        };
        self.get_json(path)
    }

    pub fn sms_services(&self, country: u32) -> Result<ServicesResponse, ApiError> {
        self.get_json(&format!("/api/sms-api/services?country={}", country))
    }

    pub fn get_numbers(&self, country: u32, quantity: u32) -> Result<GetNumbersResponse, ApiError> {
        self.request_json(
            "/api/sms-api/get-numbers",
            RequestOptions::post(json!({ "country": country, "quantity": quantity })),
        )
    }

    // Dashboard, logs and settings

    pub fn dashboard(&self) -> Result<DashboardStats, ApiError> {
        self.get_json("/api/dashboard")
    }

    pub fn logs(&self, page: u32, page_size: u32) -> Result<LogPage, ApiError> {
        self.get_json(&format!("/api/logs?page={}&page_size={}", page, page_size))
    }

    pub fn settings(&self) -> Result<Settings, ApiError> {
        let map: Map<String, Value> = self.get_json("/api/settings")?;
        Ok(Settings::from_map(&map))
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), ApiError> {
        self.send("/api/settings", RequestOptions::put(settings.to_payload()))
    }

    /// Change the console's own login. The current token stays valid until logout.
    pub fn update_login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        self.send(
            "/api/settings/login",
            RequestOptions::put(json!({
                "admin_username": username,
                "admin_password": password,
            })),
        )
    }

    fn batch_import(&self, path: &str, lines: &str) -> Result<AddedResponse, ApiError> {
        self.request_json(path, RequestOptions::post(json!({ "lines": lines })))
    }
}
