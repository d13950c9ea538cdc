//! The four pool resources the list controller is instantiated for

use serde::de::DeserializeOwned;

use crate::models::{Account, BankCard, Mailbox, Phone, yes_no};

/// Default rows per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A listable backend resource
pub trait Resource {
    type Item: DeserializeOwned + Clone + Send + 'static;

    /// Display name used in logs and panel titles
    const NAME: &'static str;
    /// List endpoint
    const PATH: &'static str;
    const PAGE_SIZE: u32 = DEFAULT_PAGE_SIZE;
    /// True when the endpoint pages on the server (`page`/`page_size` params, `total` field)
    const SERVER_PAGED: bool = false;
    /// True when a failed load replaces the rows with an inline error row
    const CLEAR_ON_FAILURE: bool = false;
    /// Filter keys the endpoint understands
    const FILTERS: &'static [&'static str] = &[];

    fn columns() -> &'static [&'static str];
    fn row(item: &Self::Item) -> Vec<String>;
    fn id(item: &Self::Item) -> i64;
}

/// Registered accounts (server paged)
pub struct Accounts;

impl Resource for Accounts {
    type Item = Account;

    const NAME: &'static str = "accounts";
    const PATH: &'static str = "/api/accounts";
    const SERVER_PAGED: bool = true;
    const FILTERS: &'static [&'static str] = &["status", "has_sora", "has_plus", "phone_bound"];

    fn columns() -> &'static [&'static str] {
        &["ID", "邮箱", "密码", "状态", "Sora", "Plus", "已绑手机", "注册时间"]
    }

    fn row(item: &Account) -> Vec<String> {
        vec![
            item.id.to_string(),
            item.email.clone(),
            item.password.clone().unwrap_or_default(),
            item.status.clone().unwrap_or_default(),
            yes_no(item.has_sora).to_string(),
            yes_no(item.has_plus).to_string(),
            yes_no(item.phone_bound).to_string(),
            item.registered_display().to_string(),
        ]
    }

    fn id(item: &Account) -> i64 {
        item.id
    }
}

/// Mailboxes
pub struct Mailboxes;

impl Resource for Mailboxes {
    type Item = Mailbox;

    const NAME: &'static str = "mailboxes";
    const PATH: &'static str = "/api/emails";

    fn columns() -> &'static [&'static str] {
        &["ID", "邮箱", "密码", "UUID", "状态"]
    }

    fn row(item: &Mailbox) -> Vec<String> {
        vec![
            item.id.to_string(),
            item.email.clone(),
            item.masked_password().to_string(),
            item.short_uuid(),
            item.registered_label().to_string(),
        ]
    }

    fn id(item: &Mailbox) -> i64 {
        item.id
    }
}

/// Phone numbers. A failed load shows an inline error row instead of stale rows.
pub struct Phones;

impl Resource for Phones {
    type Item = Phone;

    const NAME: &'static str = "phones";
    const PATH: &'static str = "/api/phones";
    const CLEAR_ON_FAILURE: bool = true;

    fn columns() -> &'static [&'static str] {
        &["ID", "手机号", "使用次数", "过期时间", "备注"]
    }

    fn row(item: &Phone) -> Vec<String> {
        vec![
            item.id.to_string(),
            item.phone.clone().unwrap_or_default(),
            item.usage(),
            item.expiry_display(),
            item.remark.clone().unwrap_or_default(),
        ]
    }

    fn id(item: &Phone) -> i64 {
        item.id
    }
}

/// Bank cards
pub struct BankCards;

impl Resource for BankCards {
    type Item = BankCard;

    const NAME: &'static str = "bank cards";
    const PATH: &'static str = "/api/bank-cards";

    fn columns() -> &'static [&'static str] {
        &["ID", "卡号", "使用次数", "备注"]
    }

    fn row(item: &BankCard) -> Vec<String> {
        vec![
            item.id.to_string(),
            item.masked_number.clone().unwrap_or_default(),
            item.usage(),
            item.remark.clone().unwrap_or_default(),
        ]
    }

    fn id(item: &BankCard) -> i64 {
        item.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_match_columns() {
        let account = Account {
            id: 1,
            email: "a@b.c".to_string(),
            has_sora: true,
            ..Default::default()
        };
        let row = Accounts::row(&account);
        assert_eq!(row.len(), Accounts::columns().len());
        assert_eq!(row[4], "是");
        assert_eq!(row[5], "否");

        let card = BankCard {
            id: 2,
            ..Default::default()
        };
        assert_eq!(BankCards::row(&card).len(), BankCards::columns().len());
        assert_eq!(BankCards::row(&card)[2], "0/1");
    }

    #[test]
    fn test_only_accounts_page_on_server() {
        assert!(Accounts::SERVER_PAGED);
        assert!(!Mailboxes::SERVER_PAGED);
        assert!(Phones::CLEAR_ON_FAILURE);
        assert!(!BankCards::CLEAR_ON_FAILURE);
    }
}
