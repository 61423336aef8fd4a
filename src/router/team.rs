use crate::{
    logic::Service,
    router::util::{require, FutureExt},
    schema::Team,
};
use futures::{future::result, Future};
use serde_derive::{Deserialize, Serialize};
use warp::{http::StatusCode, Filter};

/// The route for creating a team.
pub fn add() -> Resp!() {
    #[derive(Debug, Serialize)]
    struct Response {
        team: Team,
    }

    warp::body::content_length_limit(64 * 1024)
        .and(warp::ext::get::<Service>())
        .and(warp::body::json())
        .and_then(|svc: Service, team: Team| {
            let checked = {
                let mut fields = vec![("team_name", team.team_name.as_str())];
                for member in &team.members {
                    fields.push(("user_id", member.user_id.as_str()));
                }
                require(&fields)
            };
            result(checked)
                .and_then(move |()| svc.create_team(team).err_to_rejection())
                .map(|team| {
                    warp::reply::with_status(
                        warp::reply::json(&Response { team }),
                        StatusCode::CREATED,
                    )
                })
        })
        .boxed()
}

/// The route for looking up a team.
pub fn get() -> Resp!() {
    #[derive(Debug, Deserialize)]
    struct Query {
        team_name: String,
    }

    warp::ext::get::<Service>()
        .and(warp::query())
        .and_then(|svc: Service, query: Query| {
            let checked = require(&[("team_name", query.team_name.as_str())]);
            result(checked)
                .and_then(move |()| svc.get_team(query.team_name).err_to_rejection())
                .map(|team| warp::reply::json(&team))
        })
        .boxed()
}
