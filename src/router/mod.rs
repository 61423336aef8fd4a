//! The HTTP server.
//!
//! > **Router** is the the only module that knows anything about HTTP. Every other part of the
//! > system has no knowledge of how the request is really being made. The router's responsibility
//! > is to call into the domain logic, and then render that response data with an appropriate view.
//!
//! Every route speaks JSON. Errors come back as `{"error": {"code": ..., "message": ...}}`, with
//! the code picked by `errors::status_of`.

mod errors;
mod pull_request;
mod team;
mod users;
mod util;

use crate::logic::Service;
use futures::{
    future::{loop_fn, ok, Loop},
    Future,
};
use log::{info, warn};
use std::net::SocketAddr;
use warp::Filter;

/// Starts an HTTP server at the given address. The polymorphism in the return type indicates that
/// the future will never resolve, since it can be trivially used as
/// `impl Future<Item = Void, Error = Void>`.
pub fn serve_on<T, E>(addr: SocketAddr, service: Service) -> impl Future<Item = T, Error = E> {
    loop_fn((), move |()| {
        info!("Starting to serve on {}...", addr);
        let server = routes(service.clone()).with(warp::log("reviewroster::router"));
        warp::serve(server).bind(addr).then(|r| {
            let status = match r {
                Ok(()) => "success",
                Err(()) => "failure",
            };
            warn!("HTTP server exited with {}; restarting...", status);
            ok(Loop::Continue(()))
        })
    })
}

/// Every route, backed by the given service, with errors rendered as JSON.
pub fn routes(service: Service) -> Resp!() {
    util::set(service)
        .and(route_any! {
            POST ("team" / "add") => team::add(),
            GET ("team" / "get") => team::get(),
            POST ("users" / "setIsActive") => users::set_is_active(),
            GET ("users" / "getReview") => users::get_review(),
            POST ("pullRequest" / "create") => pull_request::create(),
            POST ("pullRequest" / "merge") => pull_request::merge(),
            POST ("pullRequest" / "reassign") => pull_request::reassign(),
        })
        .recover(errors::recover)
        .boxed()
}
