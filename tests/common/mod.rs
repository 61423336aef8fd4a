//! Shared setup for the database-backed tests.
//!
//! These need a Postgres database named by `TEST_DATABASE_URL`, so they're all `#[ignore]`d; run
//! them with `cargo test -- --ignored`. Each fixture prefixes the IDs it creates with a random
//! tag, so tests can share one database and run in parallel.

#![allow(dead_code)]

use reviewroster::{
    dal::DB,
    error::{Error, ErrorKind},
    logic::registry,
    schema::{NewPullRequest, Team, TeamMember},
};
use std::{env, sync::Mutex};

static CONNECT: Mutex<()> = Mutex::new(());

pub struct Fixture {
    pub db: DB,
    tag: String,
}

impl Fixture {
    /// Connects to the test database.
    pub fn new() -> Fixture {
        let url = env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL must name a Postgres database to run these tests");

        // Migrations aren't safe to run from several connections at once.
        let db = {
            let _guard = CONNECT.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            DB::connect(&url, 8).expect("couldn't connect to the test database")
        };
        Fixture {
            db,
            tag: format!("t{:08x}", rand::random::<u32>()),
        }
    }

    /// Namespaces an ID to this fixture.
    pub fn id(&self, name: &str) -> String {
        format!("{}-{}", self.tag, name)
    }

    /// Provisions users with the given (un-namespaced) names.
    pub fn users(&self, names: &[&str]) {
        self.db
            .transaction(|store| {
                for name in names {
                    let _ = store.provision_user(&self.id(name), name)?;
                }
                Ok(())
            })
            .unwrap();
    }

    /// Provisions the given users and puts them on a new team. Each member is a name and whether
    /// they're active.
    pub fn team(&self, name: &str, members: &[(&str, bool)]) -> Team {
        let names = members.iter().map(|&(name, _)| name).collect::<Vec<_>>();
        self.users(&names);
        let team = Team {
            team_name: self.id(name),
            members: members
                .iter()
                .map(|&(name, is_active)| TeamMember {
                    user_id: self.id(name),
                    username: name.to_owned(),
                    is_active,
                })
                .collect(),
        };
        self.db
            .transaction(|store| registry::create_team(store, &team))
            .unwrap()
    }

    /// A request to create a pull request with the given (un-namespaced) ID and author.
    pub fn new_pull_request(&self, id: &str, author: &str) -> NewPullRequest {
        NewPullRequest {
            pull_request_id: self.id(id),
            pull_request_name: format!("Pull request {}", id),
            author_id: self.id(author),
            created_at: None,
        }
    }
}

/// Unwraps the error out of a result, and returns its kind.
pub fn kind_of<T: std::fmt::Debug>(result: Result<T, Error>) -> ErrorKind {
    result.unwrap_err().kind()
}
