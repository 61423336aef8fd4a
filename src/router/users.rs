use crate::{
    logic::Service,
    router::util::{require, FutureExt},
    schema::PullRequest,
};
use futures::{future::result, Future};
use serde_derive::{Deserialize, Serialize};
use warp::Filter;

/// The route for marking a user as active.
pub fn set_is_active() -> Resp!() {
    #[derive(Debug, Deserialize)]
    struct Body {
        user_id: String,
    }

    #[derive(Debug, Serialize)]
    struct Response {
        user_id: String,
        is_active: bool,
    }

    warp::body::content_length_limit(2 * 1024)
        .and(warp::ext::get::<Service>())
        .and(warp::body::json())
        .and_then(|svc: Service, body: Body| {
            let checked = require(&[("user_id", body.user_id.as_str())]);
            result(checked).and_then(move |()| {
                let user_id = body.user_id.clone();
                svc.set_user_active(body.user_id)
                    .map(move |()| {
                        warp::reply::json(&Response {
                            user_id,
                            is_active: true,
                        })
                    })
                    .err_to_rejection()
            })
        })
        .boxed()
}

/// The route for listing the pull requests a user is reviewing.
pub fn get_review() -> Resp!() {
    #[derive(Debug, Deserialize)]
    struct Query {
        user_id: String,
    }

    #[derive(Debug, Serialize)]
    struct Response {
        user_id: String,
        pull_requests: Vec<PullRequest>,
    }

    warp::ext::get::<Service>()
        .and(warp::query())
        .and_then(|svc: Service, query: Query| {
            let checked = require(&[("user_id", query.user_id.as_str())]);
            result(checked).and_then(move |()| {
                let user_id = query.user_id.clone();
                svc.reviews_of(query.user_id)
                    .map(move |pull_requests| {
                        warp::reply::json(&Response {
                            user_id,
                            pull_requests,
                        })
                    })
                    .err_to_rejection()
            })
        })
        .boxed()
}
