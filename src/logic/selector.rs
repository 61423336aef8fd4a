//! Picking reviewers.
//!
//! An eligible candidate is an active user on the author's team who isn't the author and isn't
//! already reviewing. New pull requests get up to `MAX_REVIEWERS` of them, chosen uniformly at
//! random; a reassignment takes the eligible candidate with the lowest user ID, so it is
//! reproducible.

use crate::{
    dal::Store,
    error::{Error, ErrorKind},
    schema::User,
};
use log::debug;
use rand::{seq::SliceRandom, Rng};

/// The most reviewers a pull request can have.
pub const MAX_REVIEWERS: usize = 2;

/// Selects reviewers for a new pull request by `author_id`, reading the team's members from the
/// store. Fails with `NoTeam` if the team name is empty and with `NoCandidate` if nobody is
/// eligible.
pub fn select_reviewers<R: Rng + ?Sized>(
    store: &Store,
    team_name: &str,
    author_id: &str,
    rng: &mut R,
) -> Result<Vec<String>, Error> {
    if team_name.is_empty() {
        return Err(ErrorKind::NoTeam.into());
    }
    let pool = store.active_team_members(team_name, author_id)?;
    let reviewers = choose_reviewers(&pool, team_name, author_id, rng)?;
    debug!(
        "Picked {:?} from {} candidates on {:?}",
        reviewers,
        pool.len(),
        team_name
    );
    Ok(reviewers)
}

/// Chooses up to `MAX_REVIEWERS` eligible users out of `pool`, uniformly at random. The result is
/// sorted by user ID.
pub fn choose_reviewers<R: Rng + ?Sized>(
    pool: &[User],
    team_name: &str,
    author_id: &str,
    rng: &mut R,
) -> Result<Vec<String>, Error> {
    let eligible = pool
        .iter()
        .filter(|user| is_eligible(user, team_name, author_id))
        .collect::<Vec<_>>();
    if eligible.is_empty() {
        return Err(ErrorKind::NoCandidate.into());
    }

    let mut chosen = eligible
        .choose_multiple(rng, MAX_REVIEWERS)
        .map(|user| user.user_id.clone())
        .collect::<Vec<_>>();
    chosen.sort();
    chosen.dedup();
    Ok(chosen)
}

/// Picks the replacement for `old_user_id`: the eligible user with the lowest ID who isn't
/// `old_user_id` and isn't in `assigned`.
pub fn pick_replacement<'a>(
    pool: &'a [User],
    team_name: &str,
    author_id: &str,
    old_user_id: &str,
    assigned: &[String],
) -> Option<&'a str> {
    pool.iter()
        .filter(|user| is_eligible(user, team_name, author_id))
        .filter(|user| user.user_id != old_user_id)
        .filter(|user| !assigned.contains(&user.user_id))
        .map(|user| user.user_id.as_str())
        .min()
}

fn is_eligible(user: &User, team_name: &str, author_id: &str) -> bool {
    user.is_active && user.user_id != author_id && user.team_name.as_deref() == Some(team_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashset;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::{HashMap, HashSet};

    fn user(id: &str, team: &str, active: bool) -> User {
        User {
            user_id: id.to_owned(),
            username: format!("{}-name", id),
            team_name: Some(team.to_owned()),
            is_active: active,
        }
    }

    fn alpha() -> Vec<User> {
        (1..=5)
            .map(|n| user(&format!("U{}", n), "Alpha", true))
            .collect()
    }

    #[test]
    fn picks_two_of_a_larger_pool() {
        let pool = alpha();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let chosen = choose_reviewers(&pool, "Alpha", "U1", &mut rng).unwrap();
            assert_eq!(chosen.len(), 2);
            assert_ne!(chosen[0], chosen[1]);
            assert!(!chosen.contains(&"U1".to_owned()));
        }
    }

    #[test]
    fn takes_everyone_from_a_small_pool() {
        let pool = vec![user("U1", "Alpha", true), user("U2", "Alpha", true)];
        let mut rng = StdRng::seed_from_u64(2);
        let chosen = choose_reviewers(&pool, "Alpha", "U1", &mut rng).unwrap();
        assert_eq!(chosen, vec!["U2".to_owned()]);

        let pool = vec![
            user("U3", "Alpha", true),
            user("U1", "Alpha", true),
            user("U2", "Alpha", true),
        ];
        let chosen = choose_reviewers(&pool, "Alpha", "U1", &mut rng).unwrap();
        assert_eq!(chosen, vec!["U2".to_owned(), "U3".to_owned()]);
    }

    #[test]
    fn skips_inactive_users_and_other_teams() {
        let pool = vec![
            user("U1", "Alpha", true),
            user("U2", "Alpha", false),
            user("U3", "Beta", true),
            user("U4", "Alpha", true),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        let chosen = choose_reviewers(&pool, "Alpha", "U1", &mut rng).unwrap();
        assert_eq!(chosen, vec!["U4".to_owned()]);
    }

    #[test]
    fn an_author_alone_has_no_candidates() {
        let pool = vec![user("U1", "Alpha", true), user("U2", "Alpha", false)];
        let mut rng = StdRng::seed_from_u64(4);
        let err = choose_reviewers(&pool, "Alpha", "U1", &mut rng).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoCandidate);

        let err = choose_reviewers(&[], "Alpha", "U1", &mut rng).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoCandidate);
    }

    #[test]
    fn same_seed_same_choice() {
        let pool = alpha();
        let a = choose_reviewers(&pool, "Alpha", "U1", &mut StdRng::seed_from_u64(42)).unwrap();
        let b = choose_reviewers(&pool, "Alpha", "U1", &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn choice_is_not_biased_by_identity() {
        let pool = alpha();
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = HashMap::new();
        let trials = 8000;
        for _ in 0..trials {
            for id in choose_reviewers(&pool, "Alpha", "U1", &mut rng).unwrap() {
                *counts.entry(id).or_insert(0) += 1;
            }
        }

        let seen = counts.keys().cloned().collect::<HashSet<_>>();
        let expected = hashset! {
            "U2".to_owned(),
            "U3".to_owned(),
            "U4".to_owned(),
            "U5".to_owned(),
        };
        assert_eq!(seen, expected);

        // Each of the four candidates should be picked in half the trials.
        for (id, count) in counts {
            assert!(
                count > 3600 && count < 4400,
                "{} was picked {} times out of {}",
                id,
                count,
                trials
            );
        }
    }

    #[test]
    fn replacement_is_lowest_eligible_id() {
        let pool = alpha();
        let assigned = vec!["U2".to_owned(), "U4".to_owned()];
        assert_eq!(
            pick_replacement(&pool, "Alpha", "U1", "U2", &assigned),
            Some("U3")
        );
        assert_eq!(
            pick_replacement(&pool, "Alpha", "U1", "U4", &assigned),
            Some("U3")
        );
    }

    #[test]
    fn replacement_never_picks_author_old_or_assigned() {
        let pool = vec![
            user("U1", "Alpha", true),
            user("U2", "Alpha", true),
            user("U3", "Alpha", true),
        ];
        let assigned = vec!["U2".to_owned(), "U3".to_owned()];
        assert_eq!(
            pick_replacement(&pool, "Alpha", "U1", "U2", &assigned),
            None
        );

        let pool = vec![
            user("U1", "Alpha", true),
            user("U2", "Alpha", true),
            user("U3", "Alpha", false),
            user("U5", "Alpha", true),
        ];
        let assigned = vec!["U2".to_owned()];
        assert_eq!(
            pick_replacement(&pool, "Alpha", "U1", "U2", &assigned),
            Some("U5")
        );
    }
}
