//! Single-record creation from the add forms

use log::info;

use crate::api::{ApiError, SessionClient};
use crate::console::Panel;
use crate::models::{NewBankCard, NewMailbox, NewPhone};

#[derive(Debug, Clone, PartialEq)]
pub enum NewRecord {
    Mailbox(NewMailbox),
    BankCard(NewBankCard),
    Phone(NewPhone),
}

impl NewRecord {
    pub fn panel(&self) -> Panel {
        match self {
            NewRecord::Mailbox(_) => Panel::Emails,
            NewRecord::BankCard(_) => Panel::BankCards,
            NewRecord::Phone(_) => Panel::Phones,
        }
    }

    /// Required fields present. The backend rejects blank emails and phones.
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            NewRecord::Mailbox(m) if m.email.trim().is_empty() => Err("邮箱不能为空"),
            NewRecord::Phone(p) if p.phone.trim().is_empty() => Err("手机号不能为空"),
            _ => Ok(()),
        }
    }

    /// Toast shown after a successful add
    pub fn success_message(&self) -> Option<&'static str> {
        match self {
            NewRecord::Phone(_) => Some("已添加"),
            _ => None,
        }
    }

    pub fn execute(&self, client: &SessionClient) -> Result<(), ApiError> {
        match self {
            NewRecord::Mailbox(m) => client.create_mailbox(m)?,
            NewRecord::BankCard(c) => client.create_bank_card(c)?,
            NewRecord::Phone(p) => client.create_phone(p)?,
        }
        info!("Created {:?} record", self.panel());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_identifier() {
        let blank = NewRecord::Phone(NewPhone {
            phone: "  ".to_string(),
            max_use_count: 1,
            remark: String::new(),
        });
        assert_eq!(blank.validate(), Err("手机号不能为空"));

        let card = NewRecord::BankCard(NewBankCard::masked("", 1, ""));
        assert_eq!(card.validate(), Ok(()));
        assert_eq!(card.success_message(), None);
    }
}
