//! Pull request and reviewer-assignment queries.

use crate::{
    dal::{
        schema::{pull_request_reviewers, pull_requests},
        Store,
    },
    error::Error,
    schema::{NewPullRequest, PullRequest, Status},
};
use chrono::{DateTime, Utc};
use diesel::{
    dsl::{delete, insert_into, update},
    prelude::*,
};

#[derive(Queryable)]
struct PullRequestRow {
    pull_request_id: String,
    pull_request_name: String,
    author_id: String,
    status: String,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

impl PullRequestRow {
    fn into_pull_request(self, assigned_reviewers: Vec<String>) -> Result<PullRequest, Error> {
        Ok(PullRequest {
            status: self.status.parse()?,
            pull_request_id: self.pull_request_id,
            pull_request_name: self.pull_request_name,
            author_id: self.author_id,
            created_at: self.created_at,
            merged_at: self.merged_at,
            assigned_reviewers,
        })
    }
}

impl<'a> Store<'a> {
    /// Inserts an open pull request with no reviewers. Returns `false` without changing anything
    /// if the ID is taken; a concurrent insert of the same ID blocks until the other transaction
    /// finishes.
    pub fn insert_pull_request(
        &self,
        new: &NewPullRequest,
        created_at: DateTime<Utc>,
    ) -> Result<bool, Error> {
        let inserted = insert_into(pull_requests::table)
            .values((
                pull_requests::pull_request_id.eq(new.pull_request_id.as_str()),
                pull_requests::pull_request_name.eq(new.pull_request_name.as_str()),
                pull_requests::author_id.eq(new.author_id.as_str()),
                pull_requests::status.eq(Status::Open.as_str()),
                pull_requests::created_at.eq(created_at),
            ))
            .on_conflict_do_nothing()
            .execute(self.conn)?;
        Ok(inserted == 1)
    }

    /// Assigns a reviewer to a pull request. Assigning someone who is already assigned does
    /// nothing.
    pub fn add_reviewer(&self, pull_request_id: &str, user_id: &str) -> Result<(), Error> {
        let _ = insert_into(pull_request_reviewers::table)
            .values((
                pull_request_reviewers::pull_request_id.eq(pull_request_id),
                pull_request_reviewers::user_id.eq(user_id),
            ))
            .on_conflict_do_nothing()
            .execute(self.conn)?;
        Ok(())
    }

    /// Unassigns a reviewer from a pull request. Returns `false` if they weren't assigned.
    pub fn remove_reviewer(&self, pull_request_id: &str, user_id: &str) -> Result<bool, Error> {
        let deleted = delete(pull_request_reviewers::table.find((pull_request_id, user_id)))
            .execute(self.conn)?;
        Ok(deleted == 1)
    }

    /// Loads a pull request and its reviewers.
    pub fn pull_request(&self, pull_request_id: &str) -> Result<Option<PullRequest>, Error> {
        let row = pull_requests::table
            .find(pull_request_id)
            .get_result::<PullRequestRow>(self.conn)
            .optional()?;
        self.with_reviewers(row)
    }

    /// Loads a pull request and its reviewers, holding a row lock on the pull request until the
    /// transaction ends. Anything else that locks or updates the same pull request waits.
    pub fn lock_pull_request(&self, pull_request_id: &str) -> Result<Option<PullRequest>, Error> {
        let row = pull_requests::table
            .find(pull_request_id)
            .for_update()
            .get_result::<PullRequestRow>(self.conn)
            .optional()?;
        self.with_reviewers(row)
    }

    /// Moves a pull request from `OPEN` to `MERGED`, stamping the merge time. Returns `None` if
    /// no open pull request has the ID, either because it doesn't exist or because it was already
    /// merged.
    pub fn mark_merged(
        &self,
        pull_request_id: &str,
        merged_at: DateTime<Utc>,
    ) -> Result<Option<PullRequest>, Error> {
        let row = update(
            pull_requests::table
                .find(pull_request_id)
                .filter(pull_requests::status.eq(Status::Open.as_str())),
        )
        .set((
            pull_requests::status.eq(Status::Merged.as_str()),
            pull_requests::merged_at.eq(Some(merged_at)),
        ))
        .get_result::<PullRequestRow>(self.conn)
        .optional()?;
        self.with_reviewers(row)
    }

    /// Lists the pull requests the user is assigned to review, oldest first.
    pub fn reviewed_by(&self, user_id: &str) -> Result<Vec<PullRequest>, Error> {
        let ids = pull_request_reviewers::table
            .filter(pull_request_reviewers::user_id.eq(user_id))
            .select(pull_request_reviewers::pull_request_id)
            .load::<String>(self.conn)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = pull_requests::table
            .filter(pull_requests::pull_request_id.eq_any(ids))
            .order((
                pull_requests::created_at.asc(),
                pull_requests::pull_request_id.asc(),
            ))
            .load::<PullRequestRow>(self.conn)?;
        rows.into_iter()
            .map(|row| {
                let reviewers = self.reviewers_of(&row.pull_request_id)?;
                row.into_pull_request(reviewers)
            })
            .collect()
    }

    fn reviewers_of(&self, pull_request_id: &str) -> Result<Vec<String>, Error> {
        let reviewers = pull_request_reviewers::table
            .filter(pull_request_reviewers::pull_request_id.eq(pull_request_id))
            .select(pull_request_reviewers::user_id)
            .order(pull_request_reviewers::user_id.asc())
            .load(self.conn)?;
        Ok(reviewers)
    }

    fn with_reviewers(&self, row: Option<PullRequestRow>) -> Result<Option<PullRequest>, Error> {
        match row {
            Some(row) => {
                let reviewers = self.reviewers_of(&row.pull_request_id)?;
                row.into_pull_request(reviewers).map(Some)
            }
            None => Ok(None),
        }
    }
}
