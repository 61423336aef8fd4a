//! Team and user operations.
//!
//! Users are provisioned outside of team management; creating a team only binds users that
//! already exist.

use crate::{
    dal::Store,
    error::{Error, ErrorKind},
    schema::{PullRequest, Team},
};
use log::info;

/// Creates a team and binds its members to it, updating each member's name and active flag.
pub fn create_team(store: &Store, team: &Team) -> Result<Team, Error> {
    if !store.insert_team(&team.team_name)? {
        return Err(ErrorKind::TeamAlreadyExists.into());
    }
    if team.members.is_empty() {
        return Err(ErrorKind::EmptyTeam.into());
    }
    for member in &team.members {
        if !store.bind_member(&team.team_name, member)? {
            return Err(ErrorKind::MemberNotFound.into());
        }
    }

    let members = store.team_members(&team.team_name)?;
    info!(
        "Created team {:?} with {} member(s)",
        team.team_name,
        members.len()
    );
    Ok(Team {
        team_name: team.team_name.clone(),
        members,
    })
}

/// Gets a team and the users currently on it.
pub fn get_team(store: &Store, team_name: &str) -> Result<Team, Error> {
    if !store.team_exists(team_name)? {
        return Err(ErrorKind::NotFound.into());
    }
    Ok(Team {
        team_name: team_name.to_owned(),
        members: store.team_members(team_name)?,
    })
}

/// Marks a user as active. Activating an active user does nothing.
pub fn set_user_active(store: &Store, user_id: &str) -> Result<(), Error> {
    if store.activate_user(user_id)? {
        info!("Activated user {:?}", user_id);
        Ok(())
    } else {
        Err(ErrorKind::NotFound.into())
    }
}

/// Lists the pull requests a user is assigned to review.
pub fn reviews_of(store: &Store, user_id: &str) -> Result<Vec<PullRequest>, Error> {
    if !store.user_exists(user_id)? {
        return Err(ErrorKind::NotFound.into());
    }
    store.reviewed_by(user_id)
}

/// Provisions users `u1` through `u{count}`, skipping any that already exist. Returns how many
/// were created.
pub fn seed_users(store: &Store, count: usize) -> Result<usize, Error> {
    let mut created = 0;
    for n in 1..=count {
        if store.provision_user(&format!("u{}", n), &format!("user-{}", n))? {
            created += 1;
        }
    }
    if created > 0 {
        info!("Seeded {} user(s)", created);
    }
    Ok(created)
}
