use std::{
    fmt::{Display, Formatter},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, PoisonError, RwLock,
    },
    time::Duration,
};

use rand::Rng;
use tokio::sync::watch;

use crate::{
    rate_limit::Debouncer,
    users::{HttpUserSource, SharedUserSource, User, UserCache, UserId},
    view::ViewState,
};

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com/users";
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_USER_ID: UserId = 10;

#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct SessionConfig {
    #[builder(setter(into), default = "DEFAULT_BASE_URL.to_string()")]
    pub base_url: String,
    #[builder(default = "DEFAULT_COOLDOWN")]
    pub cooldown: Duration,
    /// Random ids are drawn from `1..=max_user_id`.
    #[builder(default = "DEFAULT_MAX_USER_ID")]
    pub max_user_id: UserId,
    /// Ignore a trigger whose id is the user already on screen.
    #[builder(default = "true")]
    pub skip_current_user: bool,
}

impl SessionConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.max_user_id {
            Some(0) => Err("max_user_id must be at least 1".to_string()),
            _ => Ok(()),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cooldown: DEFAULT_COOLDOWN,
            max_user_id: DEFAULT_MAX_USER_ID,
            skip_current_user: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    SkippedCurrent(UserId),
    ServedFromCache(UserId),
    Scheduled(UserId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerError {
    OutOfRange { id: UserId, max: UserId },
    EmptyRange,
}

impl Display for TriggerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerError::OutOfRange { id, max } => {
                write!(f, "user id {} is outside 1..={}", id, max)
            }
            TriggerError::EmptyRange => write!(f, "no user ids to pick from"),
        }
    }
}
impl std::error::Error for TriggerError {}

/// One run of the client: the cache, what is on screen, and the debounced
/// fetch path. Dropping the session cancels a fetch that is still waiting
/// out its cooldown.
pub struct UserSession {
    state: Arc<SessionState>,
    limited_fetch: Debouncer<UserId>,
    max_user_id: UserId,
    skip_current_user: bool,
}

struct SessionState {
    source: SharedUserSource,
    cache: RwLock<UserCache>,
    view: watch::Sender<ViewState>,
    // only touched while holding the view lock
    in_flight: AtomicUsize,
}

impl UserSession {
    pub fn new(config: SessionConfig, source: SharedUserSource) -> Self {
        let (view, _) = watch::channel(ViewState::default());
        let state = Arc::new(SessionState {
            source,
            cache: RwLock::new(UserCache::new()),
            view,
            in_flight: AtomicUsize::new(0),
        });

        let fetch_state = state.clone();
        let limited_fetch = Debouncer::limit(
            move |id| {
                let state = fetch_state.clone();
                async move {
                    state.receive_user(id).await;
                }
            },
            config.cooldown,
        );

        Self {
            state,
            limited_fetch,
            max_user_id: config.max_user_id,
            skip_current_user: config.skip_current_user,
        }
    }

    pub fn with_http(config: SessionConfig) -> Self {
        let source = Arc::new(HttpUserSource::new(config.base_url.clone()));
        Self::new(config, source)
    }

    /// Picks a random id and hands it to [`UserSession::trigger_with`].
    pub fn trigger(&self) -> Result<TriggerOutcome, TriggerError> {
        if self.max_user_id == 0 {
            return Err(TriggerError::EmptyRange);
        }
        let id = rand::thread_rng().gen_range(1..=self.max_user_id);
        self.trigger_with(id)
    }

    pub fn trigger_with(&self, id: UserId) -> Result<TriggerOutcome, TriggerError> {
        if id == 0 || id > self.max_user_id {
            log::warn!("rejected trigger for user {}", id);
            return Err(TriggerError::OutOfRange {
                id,
                max: self.max_user_id,
            });
        }

        if self.skip_current_user && self.current_user().map_or(false, |user| user.id == id) {
            log::debug!("user {} is already displayed", id);
            return Ok(TriggerOutcome::SkippedCurrent(id));
        }

        if let Some(user) = self.state.cached(id) {
            log::debug!("cache hit for user {}", id);
            self.state.display(user);
            return Ok(TriggerOutcome::ServedFromCache(id));
        }

        log::debug!(
            "scheduling fetch of user {} in {:?}",
            id,
            self.limited_fetch.cooldown()
        );
        self.limited_fetch.call(id);
        Ok(TriggerOutcome::Scheduled(id))
    }

    /// The fetch path without the cooldown. Failures are logged and yield
    /// `None`; the displayed user stays as it was.
    pub async fn get_user(&self, id: UserId) -> Option<User> {
        self.state.receive_user(id).await
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.view.subscribe()
    }

    pub fn view_state(&self) -> ViewState {
        self.state.view.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.view.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.view.borrow().loading
    }

    pub fn cache(&self) -> UserCache {
        self.state.cache_snapshot()
    }

    pub fn has_pending_fetch(&self) -> bool {
        self.limited_fetch.is_pending()
    }

    pub fn shutdown(&self) {
        if self.limited_fetch.cancel() {
            log::debug!("cancelled pending fetch on shutdown");
        }
    }
}

impl SessionState {
    async fn receive_user(&self, id: UserId) -> Option<User> {
        if let Some(user) = self.cached(id) {
            log::debug!("cache hit for user {}", id);
            self.display(user.clone());
            return Some(user);
        }

        let _loading = LoadingGuard::start(self);
        match self.source.fetch_user(id).await {
            Ok(user) => {
                log::info!("fetched user {} ({})", id, user.name);
                self.store(id, user.clone());
                self.display(user.clone());
                Some(user)
            }
            Err(e) => {
                log::error!("Error fetching user {}: {}", id, e);
                None
            }
        }
    }

    fn cached(&self, id: UserId) -> Option<User> {
        self.cache_snapshot().get(id).cloned()
    }

    fn cache_snapshot(&self) -> UserCache {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, id: UserId, user: User) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache = cache.with_user(id, user);
    }

    fn display(&self, user: User) {
        self.view.send_if_modified(|view| {
            if view.user.as_ref() == Some(&user) {
                return false;
            }
            view.user = Some(user);
            true
        });
    }
}

/// Raises the loading flag for as long as it lives. Overlapping fetches keep
/// the flag up until the last one is done.
struct LoadingGuard<'a> {
    state: &'a SessionState,
}

impl<'a> LoadingGuard<'a> {
    fn start(state: &'a SessionState) -> Self {
        state.view.send_if_modified(|view| {
            state.in_flight.fetch_add(1, Ordering::SeqCst);
            let changed = !view.loading;
            view.loading = true;
            changed
        });
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let in_flight = &self.state.in_flight;
        self.state.view.send_if_modified(|view| {
            if in_flight.fetch_sub(1, Ordering::SeqCst) != 1 {
                return false;
            }
            view.loading = false;
            true
        });
    }
}
