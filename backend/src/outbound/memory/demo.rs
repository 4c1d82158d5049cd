//! Demo accounts for local development.
//!
//! Seeds one household with a parent account and one platform
//! administrator. Only enabled through `HEARTH_AUTH_SEED_DEMO`.

use mockable::Clock;
use tracing::warn;

use super::{InMemoryIdentityStore, ProvisioningError};
use crate::domain::{
    ApplicationUser, Household, HouseholdId, HouseholdName, Role, UserId, UserName,
};

/// Sign-in name of the seeded household member.
pub const DEMO_MEMBER_USERNAME: &str = "demo";
/// Sign-in name of the seeded administrator.
pub const DEMO_ADMIN_USERNAME: &str = "admin";

/// Password of the seeded household member.
pub const DEMO_MEMBER_PASSWORD: &str = "demo-password";
/// PIN of the seeded household member, usable once a device is remembered.
pub const DEMO_MEMBER_PIN: &str = "1234";
/// Password of the seeded administrator.
pub const DEMO_ADMIN_PASSWORD: &str = "admin-password";

const DEMO_HOUSEHOLD_NAME: &str = "Demo Household";

/// Identifiers minted while seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSeed {
    /// The demo household.
    pub household_id: HouseholdId,
    /// The household member.
    pub member_id: UserId,
    /// The platform administrator.
    pub admin_id: UserId,
}

fn invalid_seed(err: impl std::fmt::Display) -> ProvisioningError {
    ProvisioningError::Invalid {
        message: err.to_string(),
    }
}

/// Seed demo accounts into `store`.
pub fn seed_demo(
    store: &InMemoryIdentityStore,
    clock: &dyn Clock,
) -> Result<DemoSeed, ProvisioningError> {
    let name = HouseholdName::new(DEMO_HOUSEHOLD_NAME).map_err(invalid_seed)?;
    let household = Household::create(name, clock);
    let household_id = *household.id();
    store.add_household(household)?;

    let member_id = UserId::random();
    store.add_user(
        ApplicationUser::member(
            member_id.clone(),
            UserName::new(DEMO_MEMBER_USERNAME).map_err(invalid_seed)?,
            household_id,
            [Role::parent()],
        ),
        DEMO_MEMBER_PASSWORD,
        Some(DEMO_MEMBER_PIN),
    )?;

    let admin_id = UserId::random();
    store.add_user(
        ApplicationUser::administrator(
            admin_id.clone(),
            UserName::new(DEMO_ADMIN_USERNAME).map_err(invalid_seed)?,
            [],
        ),
        DEMO_ADMIN_PASSWORD,
        None,
    )?;

    warn!(
        household_id = %household_id,
        member = DEMO_MEMBER_USERNAME,
        admin = DEMO_ADMIN_USERNAME,
        "demo accounts seeded; do not enable outside development"
    );
    Ok(DemoSeed {
        household_id,
        member_id,
        admin_id,
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::IdentityStore;
    use mockable::DefaultClock;

    #[tokio::test]
    async fn seeds_member_and_administrator() {
        let store = InMemoryIdentityStore::new();
        let seed = seed_demo(&store, &DefaultClock).expect("seeded");

        let member = store
            .find_by_id(&seed.member_id)
            .await
            .expect("lookup")
            .expect("member present");
        let admin = store
            .find_by_id(&seed.admin_id)
            .await
            .expect("lookup")
            .expect("admin present");

        assert_eq!(member.household_id(), Some(&seed.household_id));
        assert!(admin.is_admin());
    }
}
