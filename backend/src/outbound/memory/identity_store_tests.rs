//! Regression coverage for this module.

use super::*;
use crate::domain::{HouseholdName, Role};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

struct Seeded {
    store: InMemoryIdentityStore,
    household: HouseholdId,
    member: ApplicationUser,
}

#[fixture]
fn seeded() -> Seeded {
    let store = InMemoryIdentityStore::new();
    let household = Household::create(
        HouseholdName::new("Smith Family").expect("valid name"),
        &DefaultClock,
    );
    let household_id = *household.id();
    let member = ApplicationUser::member(
        UserId::random(),
        UserName::new("jane").expect("valid name"),
        household_id,
        [Role::parent()],
    );
    store.add_household(household).expect("household added");
    store
        .add_user(member.clone(), "correct horse", Some("2468"))
        .expect("user added");
    Seeded {
        store,
        household: household_id,
        member,
    }
}

#[rstest]
#[tokio::test]
async fn finds_users_by_name_and_id(seeded: Seeded) {
    let by_name = seeded
        .store
        .find_by_username(seeded.member.user_name())
        .await
        .expect("lookup");
    let by_id = seeded
        .store
        .find_by_id(seeded.member.id())
        .await
        .expect("lookup");
    let missing = seeded
        .store
        .find_by_username(&UserName::new("nobody").expect("valid name"))
        .await
        .expect("lookup");

    assert_eq!(by_name.as_ref(), Some(&seeded.member));
    assert_eq!(by_id.as_ref(), Some(&seeded.member));
    assert!(missing.is_none());
}

#[rstest]
#[tokio::test]
async fn verifies_password_and_pin(seeded: Seeded) {
    let id = seeded.member.id();
    let store = &seeded.store;

    assert!(
        store
            .verify_password(id, &Password::new("correct horse"))
            .await
            .expect("verify")
    );
    assert!(
        !store
            .verify_password(id, &Password::new("wrong"))
            .await
            .expect("verify")
    );
    assert!(
        store
            .verify_pin(id, &Pin::parse("2468").expect("valid pin"))
            .await
            .expect("verify")
    );
    assert!(
        !store
            .verify_pin(id, &Pin::parse("1357").expect("valid pin"))
            .await
            .expect("verify")
    );
}

#[rstest]
#[tokio::test]
async fn remembered_devices_resolve_to_their_user(seeded: Seeded) {
    let device = DeviceId::new("kitchen-tablet").expect("valid device");
    assert!(
        seeded
            .store
            .find_by_device(&device)
            .await
            .expect("lookup")
            .is_none()
    );

    seeded
        .store
        .remember_device(seeded.member.id(), &device)
        .await
        .expect("bind");

    let bound = seeded.store.find_by_device(&device).await.expect("lookup");
    assert_eq!(bound.as_ref(), Some(&seeded.member));
}

#[rstest]
#[tokio::test]
async fn deactivation_is_visible_through_the_port(seeded: Seeded) {
    seeded
        .store
        .deactivate_household(&seeded.household)
        .expect("deactivate");

    let household = seeded
        .store
        .find_household(&seeded.household)
        .await
        .expect("lookup")
        .expect("household present");
    assert!(!household.is_active());
}

#[rstest]
#[tokio::test]
async fn offline_store_reports_unavailable(seeded: Seeded) {
    seeded.store.set_available(false);

    let err = seeded
        .store
        .find_by_username(seeded.member.user_name())
        .await
        .expect_err("offline");
    assert!(err.is_unavailable());

    let bind = seeded
        .store
        .remember_device(
            seeded.member.id(),
            &DeviceId::new("hall-phone").expect("valid device"),
        )
        .await;
    assert!(bind.is_err());
}

#[rstest]
fn provisioning_rejects_bad_input(seeded: Seeded) {
    let duplicate = ApplicationUser::member(
        UserId::random(),
        UserName::new("jane").expect("valid name"),
        seeded.household,
        [Role::child()],
    );
    assert_eq!(
        seeded.store.add_user(duplicate, "pw", None),
        Err(ProvisioningError::DuplicateUserName(
            UserName::new("jane").expect("valid name")
        ))
    );

    let orphan_household = HouseholdId::random();
    let orphan = ApplicationUser::member(
        UserId::random(),
        UserName::new("sam").expect("valid name"),
        orphan_household,
        [Role::child()],
    );
    assert_eq!(
        seeded.store.add_user(orphan, "pw", None),
        Err(ProvisioningError::UnknownHousehold(orphan_household))
    );

    let bad_pin = ApplicationUser::administrator(
        UserId::random(),
        UserName::new("ops").expect("valid name"),
        std::iter::empty(),
    );
    assert!(matches!(
        seeded.store.add_user(bad_pin, "pw", Some("12")),
        Err(ProvisioningError::InvalidPin(_))
    ));
}

#[rstest]
#[tokio::test]
async fn decoy_verification_runs_a_real_hash_check(seeded: Seeded) {
    let decoy = decoy_hash().expect("decoy hash prepared");
    assert!(decoy.as_str().starts_with("$argon2id$"));

    seeded
        .store
        .verify_decoy("whatever")
        .await
        .expect("decoy verified");

    seeded.store.set_available(false);
    assert!(matches!(
        seeded.store.verify_decoy("whatever").await,
        Err(IdentityStoreError::Unavailable { .. })
    ));
}
