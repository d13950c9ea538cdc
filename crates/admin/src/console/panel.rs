//! Top-level navigation

/// Admin panels, in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Panel {
    /// Batch generation: dashboard stats and the operations log
    Dashboard,
    Accounts,
    Emails,
    BankCards,
    Phones,
    Settings,
}

impl Panel {
    pub const ALL: [Panel; 6] = [
        Panel::Dashboard,
        Panel::Accounts,
        Panel::Emails,
        Panel::BankCards,
        Panel::Phones,
        Panel::Settings,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Panel::Dashboard => "批量生成",
            Panel::Accounts => "账号管理",
            Panel::Emails => "邮箱管理",
            Panel::BankCards => "银行卡管理",
            Panel::Phones => "手机号管理",
            Panel::Settings => "系统设置",
        }
    }

    /// Short name used on the command line
    pub fn slug(&self) -> &'static str {
        match self {
            Panel::Dashboard => "dashboard",
            Panel::Accounts => "accounts",
            Panel::Emails => "emails",
            Panel::BankCards => "cards",
            Panel::Phones => "phones",
            Panel::Settings => "settings",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Panel> {
        Panel::ALL.into_iter().find(|p| p.slug() == slug)
    }

    /// Panels whose rows can be ticked for batch actions
    pub fn has_selection(&self) -> bool {
        matches!(self, Panel::BankCards | Panel::Phones)
    }
}

/// Which screen the console shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Login { error: Option<String> },
    Admin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_roundtrip() {
        for panel in Panel::ALL {
            assert_eq!(Panel::from_slug(panel.slug()), Some(panel));
        }
        assert_eq!(Panel::from_slug("logs"), None);
    }
}
