//! Various utilities.

use failure::Fail;
use futures::{future::poll_fn, Async, Future};
use log::error;

/// Logs an error, including its causes and backtrace (if possible).
pub fn log_err(err: &dyn Fail) {
    let num_errs = err.iter_chain().count();
    if num_errs <= 1 {
        error!("{}", err);
    } else {
        let mut first = true;
        for cause in err.iter_chain() {
            if first {
                first = false;
                error!("           {}", cause);
            } else {
                error!("caused by: {}", cause);
            }
        }
    }
    if let Some(bt) = err.backtrace() {
        let bt = bt.to_string();
        if bt != "" {
            error!("{}", bt);
        }
    }
}

/// Runs a blocking function on the current threadpool, without tying up one of its worker
/// threads. The function may be called again if the pool has no blocking capacity left when it is
/// polled, but it is only ever run to completion once. Off a threadpool (under a current-thread
/// executor, say), the function just runs inline.
pub fn blocking<E, F, T>(mut func: F) -> impl Future<Item = T, Error = E>
where
    F: FnMut() -> Result<T, E>,
{
    poll_fn(move || {
        let polled = tokio_threadpool::blocking(|| func());
        match polled {
            Ok(Async::Ready(r)) => r.map(Async::Ready),
            Ok(Async::NotReady) => Ok(Async::NotReady),
            Err(_) => func().map(Async::Ready),
        }
    })
}

/// The type of a responder. Since `impl Trait` can't be used in `type` items, this magics one up.
macro_rules! Resp {
    () => { warp::filters::BoxedFilter<(impl warp::Reply,)> };
}

/// Inserts `.or(...)` between the given filters, each guarded by a method and a path.
macro_rules! route_any {
    ($hm:ident $hp:tt => $h:expr $(, $tm:ident $tp:tt => $t:expr)* $(,)*) => {
        route_any!(@internal @path $hm $hp).and($h)
            $(.or(route_any!(@internal @path $tm $tp).and($t)))*
    };

    (@internal @path GET ()) => {{ warp::get2() }};
    (@internal @path POST ()) => {{ warp::post2() }};
    (@internal @path $m:ident $p:tt) => {{
        use warp::path;
        route_any!(@internal @path $m ()).and(path! $p).and(warp::path::end())
    }};
}
