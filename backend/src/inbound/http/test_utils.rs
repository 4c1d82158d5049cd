//! Test helpers for inbound HTTP components.

use std::num::NonZeroU32;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::DefaultClock;

use crate::domain::ports::{LockoutPolicy, NoLockoutPolicy};
use crate::domain::{
    ApplicationUser, Authenticator, Household, HouseholdId, HouseholdName,
    IdentityPrincipalResolver, Role, UserId, UserName,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{auth, me, records};
use crate::outbound::memory::{
    DemoSeed, InMemoryIdentityStore, InMemoryLockoutPolicy, InMemoryRecordRepository,
    LockoutConfig, seed_demo,
};

/// Sign-in name of the member of the second household.
pub const NEIGHBOUR_USERNAME: &str = "neighbour";
/// Password of the member of the second household.
pub const NEIGHBOUR_PASSWORD: &str = "neighbour-password";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie a response set.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie set")
}

/// Two households backed by in-memory adapters.
///
/// The demo seed supplies the first household and the administrator; a
/// second household holds [`NEIGHBOUR_USERNAME`].
pub struct TestWorld {
    pub store: Arc<InMemoryIdentityStore>,
    pub records: Arc<InMemoryRecordRepository>,
    pub seed: DemoSeed,
    pub neighbour_household: HouseholdId,
}

impl TestWorld {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryIdentityStore::new());
        let seed = seed_demo(&store, &DefaultClock).expect("demo seed");

        let neighbours = Household::create(
            HouseholdName::new("Jones Family").expect("valid name"),
            &DefaultClock,
        );
        let neighbour_household = *neighbours.id();
        store.add_household(neighbours).expect("household added");
        store
            .add_user(
                ApplicationUser::member(
                    UserId::random(),
                    UserName::new(NEIGHBOUR_USERNAME).expect("valid name"),
                    neighbour_household,
                    [Role::parent()],
                ),
                NEIGHBOUR_PASSWORD,
                None,
            )
            .expect("neighbour added");

        Self {
            store,
            records: Arc::new(InMemoryRecordRepository::new()),
            seed,
            neighbour_household,
        }
    }

    /// Handler state without lockout.
    pub fn state(&self) -> HttpState {
        self.state_with_lockout(Arc::new(NoLockoutPolicy))
    }

    /// Handler state locking a subject after `attempts` failures.
    pub fn state_locking_after(&self, attempts: u32) -> HttpState {
        let attempts = NonZeroU32::new(attempts).expect("non-zero attempts");
        let config = LockoutConfig::new(attempts, chrono::Duration::minutes(15));
        self.state_with_lockout(Arc::new(InMemoryLockoutPolicy::new(
            config,
            Arc::new(DefaultClock),
        )))
    }

    fn state_with_lockout(&self, lockout: Arc<dyn LockoutPolicy>) -> HttpState {
        HttpState::new(
            Arc::new(Authenticator::new(
                self.store.clone(),
                lockout,
                self.store.clone(),
            )),
            Arc::new(IdentityPrincipalResolver::new(self.store.clone())),
            self.records.clone(),
            Arc::new(DefaultClock),
        )
    }
}

/// Application exposing every `/api/v1` endpoint over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(auth::login)
                .service(auth::login_pin)
                .service(auth::logout)
                .service(me::current_user)
                .service(records::list_records)
                .service(records::get_record)
                .service(records::create_record),
        )
}
