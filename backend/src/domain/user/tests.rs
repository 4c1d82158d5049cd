//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn household() -> HouseholdId {
    HouseholdId::random()
}

#[fixture]
fn member(household: HouseholdId) -> ApplicationUser {
    ApplicationUser::member(
        UserId::new(VALID_ID).expect("valid id"),
        UserName::new("alice").expect("valid name"),
        household,
        [Role::parent(), Role::child()],
    )
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6 ", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_values(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
}

#[rstest]
fn user_id_from_uuid_avoids_round_trip_parse() {
    let uuid = Uuid::parse_str(VALID_ID).expect("valid UUID");
    let user_id = UserId::from_uuid(uuid);

    assert_eq!(user_id.as_uuid(), &uuid);
    assert_eq!(user_id.as_ref(), VALID_ID);
}

#[rstest]
#[case("")]
#[case("   ")]
fn user_name_rejects_blank(#[case] raw: &str) {
    assert_eq!(
        UserName::new(raw).expect_err("blank name"),
        UserValidationError::EmptyUserName
    );
}

#[rstest]
fn user_name_is_trimmed() {
    assert_eq!(UserName::new("  bob ").expect("valid").as_ref(), "bob");
}

#[rstest]
fn role_rejects_blank() {
    assert_eq!(Role::new(" ").expect_err("blank"), UserValidationError::EmptyRole);
}

#[rstest]
fn member_summary_carries_household(member: ApplicationUser) {
    let household = *member.household_id().expect("member has a household");
    let summary = UserSummary::from(&member);
    assert_eq!(summary.household_id(), Some(&household));
    assert!(!summary.is_admin());
    assert!(summary.has_role(&Role::parent()));
    assert_eq!(summary.user_id(), member.id());
}

#[rstest]
fn administrator_summary_has_no_household() {
    let admin = ApplicationUser::administrator(
        UserId::random(),
        UserName::new("root").expect("valid"),
        [Role::new("Operator").expect("valid role")],
    );
    assert!(admin.is_admin());
    let summary = UserSummary::from(admin);
    assert!(summary.is_admin());
    assert!(summary.household_id().is_none());
}

#[rstest]
fn summary_equality_ignores_role_order(household: HouseholdId) {
    let id = UserId::random();
    let name = UserName::new("carol").expect("valid");
    let forward = ApplicationUser::member(
        id.clone(),
        name.clone(),
        household,
        [Role::parent(), Role::child()],
    );
    let reversed = ApplicationUser::member(id, name, household, [Role::child(), Role::parent()]);
    assert_eq!(UserSummary::from(forward), UserSummary::from(reversed));
}

#[rstest]
fn summary_serialises_camel_case(member: ApplicationUser) {
    let household = *member.household_id().expect("member has a household");
    let value = serde_json::to_value(UserSummary::from(member)).expect("serialise");
    assert_eq!(value.get("userId"), Some(&json!(VALID_ID)));
    assert_eq!(value.get("userName"), Some(&json!("alice")));
    assert_eq!(value.get("householdId"), Some(&json!(household.to_string())));
    assert_eq!(value.get("roles"), Some(&json!(["Child", "Parent"])));
}

#[rstest]
fn admin_summary_serialises_null_household() {
    let admin = ApplicationUser::administrator(
        UserId::random(),
        UserName::new("root").expect("valid"),
        std::iter::empty(),
    );
    let value = serde_json::to_value(UserSummary::from(admin)).expect("serialise");
    assert_eq!(value.get("householdId"), Some(&serde_json::Value::Null));
}
