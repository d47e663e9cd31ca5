//! Users dashboard view controller.
//!
//! Owns everything the users list screen shows: the loaded collection, the
//! active filter, the page position, the open filter panel and the open row
//! action menu. Filtering and pagination are always recomputed from the
//! in-memory collection; only [`Dashboard::begin_load`] touches the network,
//! and only on a cache miss.
//!
//! Loading is split so front-ends can drive the network call themselves:
//!
//! ```ignore
//! if let Some(pending) = dashboard.begin_load() {
//!     if let Some(outcome) = pending.run().await {
//!         dashboard.complete_load(outcome);
//!     }
//! }
//! ```
//!
//! Every [`PendingLoad`] carries a task generation. Starting another load or
//! unmounting cancels it, and [`Dashboard::complete_load`] drops outcomes
//! whose generation is no longer current.

use std::fmt;

use lendsqr_states::{Interaction, InteractionBus, Subscription, TaskHandle, TaskId, TaskSlot};
use log::{debug, error, info, warn};

use crate::api::UsersApi;
use crate::cache::UsersCache;
use crate::error::ApiError;
use crate::filter::{UserFilter, filter_users, organizations};
use crate::pagination::{PageItem, PageSize, PageState, page_index_list};
use crate::user::{User, UserId, UserStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Loading,
    Ready,
    /// User-visible failure message.
    Error(String),
}

/// Figures for the stats cards, computed from the unfiltered collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_users: usize,
    /// Placeholder: 24% of all users.
    pub users_with_loans: usize,
    /// Placeholder: 18% of all users.
    pub users_with_savings: usize,
}

impl DashboardStats {
    pub fn from_users(users: &[User]) -> Self {
        let total_users = users.len();
        Self {
            total_users,
            active_users: users
                .iter()
                .filter(|user| user.status == UserStatus::Active)
                .count(),
            users_with_loans: total_users * 24 / 100,
            users_with_savings: total_users * 18 / 100,
        }
    }
}

/// Table column whose header opens the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterColumn {
    Organization,
    Username,
    Email,
    PhoneNumber,
    DateJoined,
    Status,
}

impl FilterColumn {
    pub const ALL: [Self; 6] = [
        Self::Organization,
        Self::Username,
        Self::Email,
        Self::PhoneNumber,
        Self::DateJoined,
        Self::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Organization => "Organization",
            Self::Username => "Username",
            Self::Email => "Email",
            Self::PhoneNumber => "Phone number",
            Self::DateJoined => "Date joined",
            Self::Status => "Status",
        }
    }
}

impl fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Entries of the per-row action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    ViewDetails,
    Blacklist,
    Activate,
}

impl RowAction {
    pub const ALL: [Self; 3] = [Self::ViewDetails, Self::Blacklist, Self::Activate];

    pub fn label(self) -> &'static str {
        match self {
            Self::ViewDetails => "View Details",
            Self::Blacklist => "Blacklist User",
            Self::Activate => "Activate User",
        }
    }
}

impl fmt::Display for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a row action resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowActionOutcome {
    /// Navigate to the detail view of this user.
    ShowDetails(UserId),
    /// The action exists in the menu but changes nothing.
    Unsupported(RowAction),
}

/// A users fetch started by [`Dashboard::begin_load`].
#[derive(Debug)]
pub struct PendingLoad {
    handle: TaskHandle,
    api: UsersApi,
}

impl PendingLoad {
    pub fn id(&self) -> TaskId {
        self.handle.id()
    }

    /// Fetches the full collection.
    ///
    /// Resolves to `None` if the load is cancelled before the response
    /// arrives.
    pub async fn run(self) -> Option<LoadOutcome> {
        let Self { handle, api } = self;
        let token = handle.cancellation_token();
        let id = handle.id();

        tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!("Users load generation {} cancelled", id.generation());
                None
            }
            result = api.fetch_users(None, None, &[]) => Some(LoadOutcome {
                id,
                result: result.map(|page| page.records),
            }),
        }
    }
}

/// Result of a finished [`PendingLoad`], to hand back to
/// [`Dashboard::complete_load`].
#[derive(Debug)]
pub struct LoadOutcome {
    id: TaskId,
    result: Result<Vec<User>, ApiError>,
}

impl LoadOutcome {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn result(&self) -> &Result<Vec<User>, ApiError> {
        &self.result
    }
}

// Open row menu. Holding the subscription keeps it registered on the bus.
#[derive(Debug)]
struct ActionMenu {
    user_id: UserId,
    dismissals: Subscription,
}

pub struct Dashboard {
    api: UsersApi,
    cache: UsersCache,
    loads: TaskSlot,
    phase: LoadPhase,
    users: Vec<User>,
    filter: UserFilter,
    page: PageState,
    open_filter: Option<FilterColumn>,
    action_menu: Option<ActionMenu>,
    interactions: InteractionBus,
}

impl fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("phase", &self.phase)
            .field("users", &self.users.len())
            .field("filter", &self.filter)
            .field("page", &self.page)
            .field("open_filter", &self.open_filter)
            .field("action_menu", &self.action_menu.as_ref().map(|m| &m.user_id))
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// A dashboard in the `Loading` phase with nothing loaded yet.
    pub fn new(api: UsersApi, cache: UsersCache) -> Self {
        Self {
            api,
            cache,
            loads: TaskSlot::new::<Self>(),
            phase: LoadPhase::Loading,
            users: Vec::new(),
            filter: UserFilter::default(),
            page: PageState::default(),
            open_filter: None,
            action_menu: None,
            interactions: InteractionBus::new(),
        }
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    /// The full, unfiltered collection.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    // ---- Loading ----

    /// Enters `Loading` and serves the collection from cache when possible.
    ///
    /// Returns `None` on a cache hit (the dashboard is already `Ready`),
    /// otherwise the fetch to run. Any load still in flight is cancelled.
    pub fn begin_load(&mut self) -> Option<PendingLoad> {
        self.loads.cancel();
        self.phase = LoadPhase::Loading;

        if let Some(users) = self.cache.load() {
            info!("Dashboard: {} user(s) loaded from cache", users.len());
            self.set_users(users);
            return None;
        }

        let handle = self.loads.issue();
        debug!(
            "Dashboard: cache miss, fetching users (generation {})",
            handle.id().generation()
        );
        Some(PendingLoad {
            handle,
            api: self.api.clone(),
        })
    }

    /// Applies a finished load.
    ///
    /// Returns false, leaving the dashboard untouched, when the outcome
    /// belongs to a load that was superseded or cancelled.
    pub fn complete_load(&mut self, outcome: LoadOutcome) -> bool {
        let LoadOutcome { id, result } = outcome;
        if !self.loads.finish(id) {
            debug!(
                "Dashboard: dropping stale load outcome (generation {})",
                id.generation()
            );
            return false;
        }

        match result {
            Ok(users) => {
                if let Err(e) = self.cache.store(&users) {
                    warn!("Dashboard: failed to cache users: {e}");
                }
                info!("Dashboard: {} user(s) fetched", users.len());
                self.set_users(users);
            }
            Err(e) => {
                error!("Dashboard: loading users failed: {e}");
                self.phase = LoadPhase::Error(e.to_string());
            }
        }
        true
    }

    /// Begins a load and, on a cache miss, awaits and applies it.
    pub async fn load(&mut self) {
        if let Some(pending) = self.begin_load()
            && let Some(outcome) = pending.run().await
        {
            self.complete_load(outcome);
        }
    }

    /// Cancels any in-flight load and closes transient UI.
    pub fn unmount(&mut self) {
        self.loads.cancel();
        self.open_filter = None;
        self.action_menu = None;
    }

    fn set_users(&mut self, users: Vec<User>) {
        self.users = users;
        self.phase = LoadPhase::Ready;
        self.page.reset();
    }

    // ---- Filtering ----

    pub fn filter(&self) -> &UserFilter {
        &self.filter
    }

    /// Replaces the filter and goes back to page 1.
    pub fn apply_filter(&mut self, filter: UserFilter) {
        self.filter = filter;
        self.open_filter = None;
        self.page.reset();
    }

    pub fn reset_filter(&mut self) {
        self.apply_filter(UserFilter::default());
    }

    /// Users matching the current filter, in collection order.
    pub fn filtered_users(&self) -> Vec<&User> {
        filter_users(&self.users, &self.filter)
    }

    /// Distinct organizations across the whole collection.
    pub fn organizations(&self) -> Vec<String> {
        organizations(&self.users)
    }

    // ---- Pagination ----

    pub fn current_page(&self) -> usize {
        self.page.current()
    }

    pub fn page_size(&self) -> PageSize {
        self.page.size()
    }

    /// Changes the page size and goes back to page 1.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.page.set_size(size);
    }

    pub fn total_pages(&self) -> usize {
        self.page.total_pages(self.filtered_users().len())
    }

    /// Moves to `page` if it exists. Returns whether it moved.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let count = self.filtered_users().len();
        self.page.go_to(page, count)
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page.current() + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.go_to_page(self.page.current().saturating_sub(1))
    }

    /// Rows of the current page.
    pub fn visible_users(&self) -> Vec<&User> {
        self.page.slice(&self.filtered_users()).to_vec()
    }

    pub fn page_items(&self) -> Vec<PageItem> {
        page_index_list(self.page.current(), self.total_pages())
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::from_users(&self.users)
    }

    // ---- Transient UI ----

    /// Opens the filter panel for `column`, or closes it if it is already open.
    pub fn toggle_filter_panel(&mut self, column: FilterColumn) {
        self.open_filter = if self.open_filter == Some(column) {
            None
        } else {
            Some(column)
        };
    }

    pub fn open_filter_panel(&self) -> Option<FilterColumn> {
        self.open_filter
    }

    pub fn close_filter_panel(&mut self) {
        self.open_filter = None;
    }

    /// Opens the action menu of `user_id`, closing any other one, or closes
    /// it if it is already open.
    pub fn toggle_action_menu(&mut self, user_id: &UserId) {
        let was_open = self
            .action_menu
            .as_ref()
            .is_some_and(|menu| &menu.user_id == user_id);

        // Dropping the old menu drops its subscription.
        self.action_menu = None;
        if !was_open {
            self.action_menu = Some(ActionMenu {
                user_id: user_id.clone(),
                dismissals: self.interactions.subscribe(),
            });
        }
    }

    pub fn open_action_menu(&self) -> Option<&UserId> {
        self.action_menu.as_ref().map(|menu| &menu.user_id)
    }

    pub fn close_action_menu(&mut self) {
        self.action_menu = None;
    }

    /// Reports an interaction outside the open menu or panel.
    pub fn emit_interaction(&mut self, interaction: Interaction) {
        self.interactions.emit(interaction);
    }

    /// Applies pending outside interactions. Returns true if the open action
    /// menu was dismissed.
    pub fn pump_interactions(&mut self) -> bool {
        let dismissed = self
            .action_menu
            .as_ref()
            .and_then(|menu| menu.dismissals.take_pending());
        match dismissed {
            Some(interaction) => {
                debug!("Dashboard: action menu dismissed by {interaction:?}");
                self.action_menu = None;
                true
            }
            None => false,
        }
    }

    /// Runs `action` for `user_id` and closes the action menu.
    pub fn perform_row_action(&mut self, user_id: &UserId, action: RowAction) -> RowActionOutcome {
        self.action_menu = None;
        match action {
            RowAction::ViewDetails => RowActionOutcome::ShowDetails(user_id.clone()),
            RowAction::Blacklist | RowAction::Activate => {
                info!("Dashboard: `{action}` for user {user_id} is not supported");
                RowActionOutcome::Unsupported(action)
            }
        }
    }
}
