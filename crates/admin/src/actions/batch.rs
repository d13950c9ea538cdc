//! Destructive actions that go through the confirm dialog

use log::info;

use super::Control;
use crate::api::{ApiError, SessionClient};
use crate::console::Panel;
use crate::models::SelectionSet;

/// A destructive action waiting for confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteMailbox(i64),
    DeleteBankCard(i64),
    DeletePhone(i64),
    /// Cancel at the SMS provider and remove from the pool
    ReleasePhone(i64),
    BatchDeleteBankCards(Vec<i64>),
    BatchDeletePhones(Vec<i64>),
}

impl PendingAction {
    pub fn confirm_message(&self) -> String {
        match self {
            PendingAction::DeleteMailbox(_) => "确定删除该邮箱？".to_string(),
            PendingAction::DeleteBankCard(_) => "确定删除该银行卡？".to_string(),
            PendingAction::DeletePhone(_) => "确定删除该手机号？".to_string(),
            PendingAction::ReleasePhone(_) => {
                "确定销毁该号码？将通知接码平台取消并从列表移除。".to_string()
            }
            PendingAction::BatchDeleteBankCards(ids) => {
                format!("确定删除已选 {} 条银行卡？", ids.len())
            }
            PendingAction::BatchDeletePhones(ids) => {
                format!("确定删除已选 {} 个手机号？", ids.len())
            }
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            PendingAction::ReleasePhone(_) => "已销毁",
            _ => "已删除",
        }
    }

    /// Panel whose list the action changes
    pub fn panel(&self) -> Panel {
        match self {
            PendingAction::DeleteMailbox(_) => Panel::Emails,
            PendingAction::DeleteBankCard(_) | PendingAction::BatchDeleteBankCards(_) => {
                Panel::BankCards
            }
            PendingAction::DeletePhone(_)
            | PendingAction::ReleasePhone(_)
            | PendingAction::BatchDeletePhones(_) => Panel::Phones,
        }
    }

    pub fn control(&self) -> Control {
        match self {
            PendingAction::DeleteMailbox(_)
            | PendingAction::DeleteBankCard(_)
            | PendingAction::DeletePhone(_) => Control::DeleteRow,
            PendingAction::ReleasePhone(_) => Control::ReleaseRow,
            PendingAction::BatchDeleteBankCards(_) | PendingAction::BatchDeletePhones(_) => {
                Control::BatchDelete
            }
        }
    }

    /// Whether success clears the panel's selection
    pub fn is_batch(&self) -> bool {
        matches!(
            self,
            PendingAction::BatchDeleteBankCards(_) | PendingAction::BatchDeletePhones(_)
        )
    }

    /// Issue the request
    pub fn execute(&self, client: &SessionClient) -> Result<(), ApiError> {
        match self {
            PendingAction::DeleteMailbox(id) => client.delete_mailbox(*id)?,
            PendingAction::DeleteBankCard(id) => client.delete_bank_card(*id)?,
            PendingAction::DeletePhone(id) => client.delete_phone(*id)?,
            PendingAction::ReleasePhone(id) => client.release_phone(*id)?,
            PendingAction::BatchDeleteBankCards(ids) => client.batch_delete_bank_cards(ids)?,
            PendingAction::BatchDeletePhones(ids) => client.batch_delete_phones(ids)?,
        }
        info!("{:?} done", self);
        Ok(())
    }
}

/// A batch action was triggered with nothing selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptySelection {
    pub message: &'static str,
}

/// Start a batch card delete. Nothing selected means no request at all.
pub fn batch_delete_bank_cards(selection: &SelectionSet) -> Result<PendingAction, EmptySelection> {
    if selection.is_empty() {
        return Err(EmptySelection {
            message: "请先勾选要删除的卡",
        });
    }
    Ok(PendingAction::BatchDeleteBankCards(selection.ids()))
}

/// Start a batch phone delete. Nothing selected means no request at all.
pub fn batch_delete_phones(selection: &SelectionSet) -> Result<PendingAction, EmptySelection> {
    if selection.is_empty() {
        return Err(EmptySelection {
            message: "请先勾选要删除的手机号",
        });
    }
    Ok(PendingAction::BatchDeletePhones(selection.ids()))
}
