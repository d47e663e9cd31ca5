//! Users dashboard business layer.
//!
//! Fetches users from the users API, keeps them in a local cache, and drives
//! the filtered, paginated users list through [`Dashboard`]. Front-ends read
//! state from the dashboard and call its methods; they never talk to the API
//! or the store directly.

mod api;
mod cache;
mod config;
mod dashboard;
mod error;
mod filter;
pub mod http;
mod pagination;
mod session;
mod storage;
mod user;
mod user_detail;

#[cfg(test)]
mod test_utils;

pub use api::{UsersApi, UsersPage};
pub use cache::{USERS_CACHE_KEY, UsersCache};
pub use config::{BusinessConfig, ConfigError, DEFAULT_API_BASE_URL, default_data_dir};
pub use dashboard::{
    Dashboard, DashboardStats, FilterColumn, LoadOutcome, LoadPhase, PendingLoad, RowAction,
    RowActionOutcome,
};
pub use error::ApiError;
pub use filter::{UserFilter, filter_users, organizations};
pub use pagination::{
    PageItem, PageSize, PageSizeError, PageState, page_index_list, paginate, total_pages,
};
pub use session::{AUTH_FLAG_KEY, Session};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use user::{
    Account, Children, EducationEmployment, Guarantor, IncomeRange, JoinedAt, ParseJoinedAtError,
    ParseStatusError, Profile, Socials, User, UserDetails, UserId, UserStatus,
};
pub use user_detail::find_user;

pub use lendsqr_states::Interaction;
