//! Master-detail mail viewer

mod normalize;
mod state;

pub use normalize::{
    BODY_KEYS, HTML_KEYS, NO_SUBJECT, NormalizedMail, Preview, SUBJECT_KEYS, truncate,
};
pub use state::{
    DetailPane, EMPTY_DETAIL_TEXT, EMPTY_LIST_TEXT, LOADING_TEXT, MailDetail, MailListEntry,
    MailTab, MailViewer, MailViewerState, MailViewerView, RECOVERY_TEXT, RECOVERY_URL,
    ViewerState,
};
