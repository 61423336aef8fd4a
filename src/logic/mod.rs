//! Business logic.
//!
//! > **Logic** is the "business (or domain) logic" of the application. The router will pull the
//! > necessary information out of the HTTP request, and call into this module as quickly as
//! > possible to do all the actual work.
//!
//! `Service` is the entry point the router uses. It holds no state of its own; every call runs as
//! one transaction against the database, and errors come back tagged with the operation's name.

pub mod assignment;
pub mod registry;
pub mod selector;

use crate::{
    dal::DB,
    error::Error,
    schema::{NewPullRequest, PullRequest, Team},
};
use futures::Future;
use rand::thread_rng;

/// The operations exposed to the transport.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct Service {
    db: DB,
}

impl Service {
    /// Creates a service backed by the given database.
    pub fn new(db: DB) -> Service {
        Service { db }
    }

    /// Creates a pull request and assigns its reviewers.
    pub fn create_pull_request(
        &self,
        new: NewPullRequest,
    ) -> impl Future<Item = PullRequest, Error = Error> {
        self.db.async_transaction(move |store| {
            assignment::create_pull_request(store, &new, &mut thread_rng())
                .map_err(|e| e.during("create_pull_request"))
        })
    }

    /// Merges a pull request, or returns it unchanged if it's already merged.
    pub fn merge_pull_request(
        &self,
        pull_request_id: String,
    ) -> impl Future<Item = PullRequest, Error = Error> {
        self.db.async_transaction(move |store| {
            assignment::merge_pull_request(store, &pull_request_id)
                .map_err(|e| e.during("merge_pull_request"))
        })
    }

    /// Replaces one reviewer of an open pull request.
    pub fn reassign_reviewer(
        &self,
        pull_request_id: String,
        old_user_id: String,
    ) -> impl Future<Item = PullRequest, Error = Error> {
        self.db.async_transaction(move |store| {
            assignment::reassign_reviewer(store, &pull_request_id, &old_user_id)
                .map_err(|e| e.during("reassign_reviewer"))
        })
    }

    /// Creates a team out of existing users.
    pub fn create_team(&self, team: Team) -> impl Future<Item = Team, Error = Error> {
        self.db.async_transaction(move |store| {
            registry::create_team(store, &team).map_err(|e| e.during("create_team"))
        })
    }

    /// Gets a team and its members.
    pub fn get_team(&self, team_name: String) -> impl Future<Item = Team, Error = Error> {
        self.db.async_query(move |store| {
            registry::get_team(store, &team_name).map_err(|e| e.during("get_team"))
        })
    }

    /// Marks a user as active.
    pub fn set_user_active(&self, user_id: String) -> impl Future<Item = (), Error = Error> {
        self.db.async_transaction(move |store| {
            registry::set_user_active(store, &user_id).map_err(|e| e.during("set_user_active"))
        })
    }

    /// Lists the pull requests a user is reviewing.
    pub fn reviews_of(
        &self,
        user_id: String,
    ) -> impl Future<Item = Vec<PullRequest>, Error = Error> {
        self.db.async_query(move |store| {
            registry::reviews_of(store, &user_id).map_err(|e| e.during("reviews_of"))
        })
    }
}
