//! Team and user management against a real database.

mod common;

use crate::common::{kind_of, Fixture};
use reviewroster::{
    error::{Error, ErrorKind},
    logic::registry,
    schema::{Team, TeamMember},
};

fn member(fx: &Fixture, name: &str, is_active: bool) -> TeamMember {
    TeamMember {
        user_id: fx.id(name),
        username: name.to_owned(),
        is_active,
    }
}

fn create_team(fx: &Fixture, team: &Team) -> Result<Team, Error> {
    fx.db.transaction(|store| registry::create_team(store, team))
}

fn get_team(fx: &Fixture, name: &str) -> Result<Team, Error> {
    let name = fx.id(name);
    fx.db.query(|store| registry::get_team(store, &name))
}

fn set_active(fx: &Fixture, name: &str) -> Result<(), Error> {
    let user_id = fx.id(name);
    fx.db
        .transaction(|store| registry::set_user_active(store, &user_id))
}

#[test]
#[ignore = "needs a Postgres database in TEST_DATABASE_URL"]
fn teams_can_be_created_and_fetched() {
    let fx = Fixture::new();
    let created = fx.team("Alpha", &[("B", false), ("A", true)]);
    assert_eq!(created.team_name, fx.id("Alpha"));
    assert_eq!(
        created.members,
        vec![member(&fx, "A", true), member(&fx, "B", false)]
    );

    assert_eq!(get_team(&fx, "Alpha").unwrap(), created);
}

#[test]
#[ignore = "needs a Postgres database in TEST_DATABASE_URL"]
fn duplicate_teams_are_rejected() {
    let fx = Fixture::new();
    let _ = fx.team("Alpha", &[("A", true)]);
    fx.users(&["B"]);

    let again = Team {
        team_name: fx.id("Alpha"),
        members: vec![member(&fx, "B", true)],
    };
    assert_eq!(
        kind_of(create_team(&fx, &again)),
        ErrorKind::TeamAlreadyExists
    );

    // B stays off the team.
    let team = get_team(&fx, "Alpha").unwrap();
    assert_eq!(team.members, vec![member(&fx, "A", true)]);
}

#[test]
#[ignore = "needs a Postgres database in TEST_DATABASE_URL"]
fn empty_teams_are_rejected() {
    let fx = Fixture::new();
    let team = Team {
        team_name: fx.id("Nobody"),
        members: vec![],
    };
    assert_eq!(kind_of(create_team(&fx, &team)), ErrorKind::EmptyTeam);
    assert_eq!(kind_of(get_team(&fx, "Nobody")), ErrorKind::NotFound);
}

#[test]
#[ignore = "needs a Postgres database in TEST_DATABASE_URL"]
fn unknown_members_roll_the_team_back() {
    let fx = Fixture::new();
    fx.users(&["A"]);
    let team = Team {
        team_name: fx.id("Half"),
        members: vec![member(&fx, "A", true), member(&fx, "ghost", true)],
    };
    assert_eq!(kind_of(create_team(&fx, &team)), ErrorKind::MemberNotFound);
    assert_eq!(kind_of(get_team(&fx, "Half")), ErrorKind::NotFound);

    // A was never bound, so they still can't author a pull request.
    let a = fx.id("A");
    let user_team = fx.db.query(|store| store.team_of(&a));
    assert_eq!(kind_of(user_team), ErrorKind::NoTeam);
}

#[test]
#[ignore = "needs a Postgres database in TEST_DATABASE_URL"]
fn members_move_between_teams() {
    let fx = Fixture::new();
    let _ = fx.team("Old", &[("A", true), ("B", true)]);
    let _ = fx.team("New", &[("A", false)]);

    let old = get_team(&fx, "Old").unwrap();
    let new = get_team(&fx, "New").unwrap();
    assert_eq!(old.members, vec![member(&fx, "B", true)]);
    assert_eq!(new.members, vec![member(&fx, "A", false)]);
}

#[test]
#[ignore = "needs a Postgres database in TEST_DATABASE_URL"]
fn users_can_be_activated() {
    let fx = Fixture::new();
    let _ = fx.team("Alpha", &[("A", false)]);

    set_active(&fx, "A").unwrap();
    set_active(&fx, "A").unwrap();

    let team = get_team(&fx, "Alpha").unwrap();
    assert_eq!(team.members, vec![member(&fx, "A", true)]);
    assert_eq!(kind_of(set_active(&fx, "ghost")), ErrorKind::NotFound);
}

#[test]
#[ignore = "needs a Postgres database in TEST_DATABASE_URL"]
fn seeding_skips_existing_users() {
    let fx = Fixture::new();
    let first = fx
        .db
        .transaction(|store| registry::seed_users(store, 3))
        .unwrap();
    let second = fx
        .db
        .transaction(|store| registry::seed_users(store, 3))
        .unwrap();
    assert!(first <= 3);
    assert_eq!(second, 0);

    let exists = fx.db.query(|store| store.user_exists("u3")).unwrap();
    assert!(exists);
}
