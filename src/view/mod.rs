//! Pure projections from controller state to what a front-end draws.

mod format;
mod models;

pub use format::{format_bytes, format_date, format_percentage, hash_prefix};
pub use models::{
    dashboard_view, nav_items, notification_views, search_view, stat_cards, upload_view,
    verification_view, DashboardView, FileRow, NavItem, NotificationView, SearchView, StatCard,
    UploadView, VerificationRow, VerificationView, EMPTY_FILES_MESSAGE, UPLOAD_PROGRESS_TEXT,
};
