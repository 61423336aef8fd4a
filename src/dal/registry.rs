//! Team and user queries.
//!
//! Team membership is the `team_name` column on `users`; a team's members are whichever users
//! currently point at it.

use crate::{
    dal::{
        schema::{teams, users},
        Store,
    },
    error::{Error, ErrorKind},
    schema::{TeamMember, User},
};
use diesel::{
    dsl::{exists, insert_into, select, update},
    prelude::*,
};

impl<'a> Store<'a> {
    /// Returns the name of the team the user is on. Fails with `NotFound` if the user doesn't
    /// exist, and with `NoTeam` if they aren't on a team.
    ///
    /// The user's row is share-locked until the transaction ends, so they can't be moved to
    /// another team in the meantime.
    pub fn team_of(&self, user_id: &str) -> Result<String, Error> {
        let team_name = users::table
            .find(user_id)
            .select(users::team_name)
            .for_share()
            .get_result::<Option<String>>(self.conn)
            .optional()?;
        match team_name {
            None => Err(ErrorKind::NotFound.into()),
            Some(Some(team_name)) if !team_name.is_empty() => Ok(team_name),
            Some(_) => Err(ErrorKind::NoTeam.into()),
        }
    }

    /// Lists the active members of a team other than the given user, by ascending user ID. Like
    /// `team_of`, this share-locks the rows it returns, so whoever gets picked from them is still
    /// on the team when the transaction commits.
    pub fn active_team_members(
        &self,
        team_name: &str,
        excluding: &str,
    ) -> Result<Vec<User>, Error> {
        let members = users::table
            .filter(users::team_name.eq(team_name))
            .filter(users::is_active.eq(true))
            .filter(users::user_id.ne(excluding))
            .order(users::user_id.asc())
            .for_share()
            .load(self.conn)?;
        Ok(members)
    }

    /// Lists every member of a team, by ascending user ID.
    pub fn team_members(&self, team_name: &str) -> Result<Vec<TeamMember>, Error> {
        let members = users::table
            .filter(users::team_name.eq(team_name))
            .select((users::user_id, users::username, users::is_active))
            .order(users::user_id.asc())
            .load(self.conn)?;
        Ok(members)
    }

    /// Checks whether a team exists.
    pub fn team_exists(&self, team_name: &str) -> Result<bool, Error> {
        let found = select(exists(teams::table.find(team_name))).get_result(self.conn)?;
        Ok(found)
    }

    /// Inserts a team. Returns `false` without changing anything if the name is taken.
    pub fn insert_team(&self, team_name: &str) -> Result<bool, Error> {
        let inserted = insert_into(teams::table)
            .values(teams::team_name.eq(team_name))
            .on_conflict_do_nothing()
            .execute(self.conn)?;
        Ok(inserted == 1)
    }

    /// Binds an existing user to a team, updating their name and active flag to match. Returns
    /// `false` if the user doesn't exist.
    pub fn bind_member(&self, team_name: &str, member: &TeamMember) -> Result<bool, Error> {
        let updated = update(users::table.find(member.user_id.as_str()))
            .set((
                users::team_name.eq(team_name),
                users::username.eq(member.username.as_str()),
                users::is_active.eq(member.is_active),
            ))
            .execute(self.conn)?;
        Ok(updated == 1)
    }

    /// Marks a user as active. Returns `false` if the user doesn't exist.
    pub fn activate_user(&self, user_id: &str) -> Result<bool, Error> {
        let updated = update(users::table.find(user_id))
            .set(users::is_active.eq(true))
            .execute(self.conn)?;
        Ok(updated == 1)
    }

    /// Checks whether a user exists.
    pub fn user_exists(&self, user_id: &str) -> Result<bool, Error> {
        let found = select(exists(users::table.find(user_id))).get_result(self.conn)?;
        Ok(found)
    }

    /// Inserts an inactive user with no team. Returns `false` without changing anything if the ID
    /// is taken.
    pub fn provision_user(&self, user_id: &str, username: &str) -> Result<bool, Error> {
        let inserted = insert_into(users::table)
            .values((users::user_id.eq(user_id), users::username.eq(username)))
            .on_conflict_do_nothing()
            .execute(self.conn)?;
        Ok(inserted == 1)
    }
}
