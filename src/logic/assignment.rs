//! The assignment engine: creating, merging, and reassigning reviewers on pull requests.
//!
//! Each function here expects to run inside a single transaction (see `DB::transaction`), so any
//! failure leaves the store as it was.

use crate::{
    dal::Store,
    error::{Error, ErrorKind},
    logic::selector,
    schema::{NewPullRequest, PullRequest, Status},
};
use chrono::Utc;
use log::{debug, info};
use rand::Rng;

/// Creates a pull request, assigning up to two reviewers from the author's team.
pub fn create_pull_request<R: Rng + ?Sized>(
    store: &Store,
    new: &NewPullRequest,
    rng: &mut R,
) -> Result<PullRequest, Error> {
    let team_name = store.team_of(&new.author_id)?;
    let reviewers = selector::select_reviewers(store, &team_name, &new.author_id, rng)?;

    let created_at = new.created_at.unwrap_or_else(Utc::now);
    if !store.insert_pull_request(new, created_at)? {
        return Err(ErrorKind::AlreadyExists.into());
    }
    for reviewer in &reviewers {
        store.add_reviewer(&new.pull_request_id, reviewer)?;
    }

    info!(
        "Created pull request {:?} by {:?} with {} reviewer(s)",
        new.pull_request_id,
        new.author_id,
        reviewers.len()
    );
    reload(store, &new.pull_request_id)
}

/// Merges a pull request. Merging an already-merged pull request succeeds and returns it as it
/// is.
pub fn merge_pull_request(store: &Store, pull_request_id: &str) -> Result<PullRequest, Error> {
    if let Some(pr) = store.mark_merged(pull_request_id, Utc::now())? {
        info!("Merged pull request {:?}", pull_request_id);
        return Ok(pr);
    }

    let pr = store
        .pull_request(pull_request_id)?
        .ok_or(ErrorKind::NotFound)?;
    match pr.status {
        Status::Merged => {
            debug!("Pull request {:?} was already merged", pull_request_id);
            Ok(pr)
        }
        Status::Open => Err(Error::inconsistent(format!(
            "pull request {:?} is open but could not be merged",
            pull_request_id
        ))),
    }
}

/// Replaces one reviewer of an open pull request with another eligible member of the author's
/// team.
///
/// The pull request row stays locked from the first read until the transaction ends, so
/// reassignments (and merges) of the same pull request run one after another, and each one sees
/// the reviewers the previous one left behind.
pub fn reassign_reviewer(
    store: &Store,
    pull_request_id: &str,
    old_user_id: &str,
) -> Result<PullRequest, Error> {
    let pr = store
        .lock_pull_request(pull_request_id)?
        .ok_or(ErrorKind::NotFound)?;
    ensure_reassignable(&pr, old_user_id)?;

    let team_name = store.team_of(&pr.author_id)?;
    let pool = store.active_team_members(&team_name, &pr.author_id)?;
    let replacement = selector::pick_replacement(
        &pool,
        &team_name,
        &pr.author_id,
        old_user_id,
        &pr.assigned_reviewers,
    )
    .ok_or(ErrorKind::NoCandidate)?;

    if !store.remove_reviewer(pull_request_id, old_user_id)? {
        return Err(Error::inconsistent(format!(
            "{:?} vanished from the reviewers of locked pull request {:?}",
            old_user_id, pull_request_id
        )));
    }
    store.add_reviewer(pull_request_id, replacement)?;

    info!(
        "Replaced reviewer {:?} with {:?} on pull request {:?}",
        old_user_id, replacement, pull_request_id
    );
    reload(store, pull_request_id)
}

/// Checks that `old_user_id` can be swapped out of the pull request's reviewers.
pub fn ensure_reassignable(pr: &PullRequest, old_user_id: &str) -> Result<(), Error> {
    if pr.status == Status::Merged {
        Err(ErrorKind::AlreadyMerged.into())
    } else if !pr.is_reviewer(old_user_id) {
        Err(ErrorKind::ReviewerNotAssigned.into())
    } else {
        Ok(())
    }
}

fn reload(store: &Store, pull_request_id: &str) -> Result<PullRequest, Error> {
    store.pull_request(pull_request_id)?.ok_or_else(|| {
        Error::inconsistent(format!(
            "pull request {:?} disappeared mid-transaction",
            pull_request_id
        ))
    })
}
