use crate::{
    logic::Service,
    router::util::{require, FutureExt},
    schema::{NewPullRequest, PullRequest},
};
use futures::{future::result, Future};
use serde_derive::{Deserialize, Serialize};
use warp::{http::StatusCode, Filter, Reply};

#[derive(Debug, Serialize)]
struct PullRequestResponse {
    pr: PullRequest,
}

fn reply(pr: PullRequest, status: StatusCode) -> impl Reply {
    warp::reply::with_status(warp::reply::json(&PullRequestResponse { pr }), status)
}

/// The route for creating a pull request.
pub fn create() -> Resp!() {
    warp::body::content_length_limit(16 * 1024)
        .and(warp::ext::get::<Service>())
        .and(warp::body::json())
        .and_then(|svc: Service, new: NewPullRequest| {
            let checked = require(&[
                ("pull_request_id", new.pull_request_id.as_str()),
                ("pull_request_name", new.pull_request_name.as_str()),
                ("author_id", new.author_id.as_str()),
            ]);
            result(checked)
                .and_then(move |()| svc.create_pull_request(new).err_to_rejection())
                .map(|pr| reply(pr, StatusCode::CREATED))
        })
        .boxed()
}

/// The route for merging a pull request.
pub fn merge() -> Resp!() {
    #[derive(Debug, Deserialize)]
    struct Body {
        pull_request_id: String,
    }

    warp::body::content_length_limit(2 * 1024)
        .and(warp::ext::get::<Service>())
        .and(warp::body::json())
        .and_then(|svc: Service, body: Body| {
            let checked = require(&[("pull_request_id", body.pull_request_id.as_str())]);
            result(checked)
                .and_then(move |()| {
                    svc.merge_pull_request(body.pull_request_id)
                        .err_to_rejection()
                })
                .map(|pr| reply(pr, StatusCode::OK))
        })
        .boxed()
}

/// The route for replacing one of a pull request's reviewers.
pub fn reassign() -> Resp!() {
    #[derive(Debug, Deserialize)]
    struct Body {
        pull_request_id: String,
        old_user_id: String,
    }

    warp::body::content_length_limit(2 * 1024)
        .and(warp::ext::get::<Service>())
        .and(warp::body::json())
        .and_then(|svc: Service, body: Body| {
            let checked = require(&[
                ("pull_request_id", body.pull_request_id.as_str()),
                ("old_user_id", body.old_user_id.as_str()),
            ]);
            result(checked)
                .and_then(move |()| {
                    svc.reassign_reviewer(body.pull_request_id, body.old_user_id)
                        .err_to_rejection()
                })
                .map(|pr| reply(pr, StatusCode::OK))
        })
        .boxed()
}
