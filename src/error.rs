//! The errors the core can fail with.
//!
//! Every fallible operation returns an `Error`, which carries exactly one `ErrorKind` and (once it
//! leaves the logic layer) the name of the operation that failed. The kind never changes while an
//! error propagates; the transport maps kinds to responses with an exhaustive `match`.

use failure::{err_msg, Backtrace, Context, Fail};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// The closed set of ways an operation can fail.
#[derive(Clone, Copy, Debug, Eq, Fail, Hash, PartialEq)]
pub enum ErrorKind {
    /// The referenced pull request, user, or team does not exist.
    #[fail(display = "not found")]
    NotFound,

    /// A pull request with the same ID already exists.
    #[fail(display = "pull request already exists")]
    AlreadyExists,

    /// A team with the same name already exists.
    #[fail(display = "team already exists")]
    TeamAlreadyExists,

    /// The author isn't on a team, so reviewers can't be picked.
    #[fail(display = "user is not on a team")]
    NoTeam,

    /// Nobody on the author's team is eligible to review.
    #[fail(display = "no eligible reviewer on the team")]
    NoCandidate,

    /// The reviewer to replace isn't assigned to the pull request.
    #[fail(display = "reviewer is not assigned to the pull request")]
    ReviewerNotAssigned,

    /// The pull request is merged, so its reviewers are frozen.
    #[fail(display = "pull request is already merged")]
    AlreadyMerged,

    /// A team was created without any members.
    #[fail(display = "a team needs at least one member")]
    EmptyTeam,

    /// A team member refers to a user that doesn't exist.
    #[fail(display = "team member not found")]
    MemberNotFound,

    /// The store holds data the core can't make sense of.
    #[fail(display = "internal consistency error")]
    Inconsistent,

    /// The database or its connection pool failed.
    #[fail(display = "store error")]
    Store,
}

/// An error from one of the core's operations.
#[derive(Debug)]
pub struct Error {
    op: Option<&'static str>,
    inner: Context<ErrorKind>,
}

impl Error {
    /// Creates an `Inconsistent` error with a description of what was wrong.
    pub fn inconsistent(detail: String) -> Error {
        err_msg(detail).context(ErrorKind::Inconsistent).into()
    }

    /// Records the operation the error happened during. The first operation recorded wins, so the
    /// innermost name is kept.
    pub fn during(mut self, op: &'static str) -> Error {
        if self.op.is_none() {
            self.op = Some(op);
        }
        self
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        *self.inner.get_context()
    }

    /// Returns the name of the operation that failed, if one was recorded.
    pub fn op(&self) -> Option<&'static str> {
        self.op
    }
}

impl Display for Error {
    fn fmt(&self, fmt: &mut Formatter) -> FmtResult {
        match self.op {
            Some(op) => write!(fmt, "{}: {}", op, self.inner),
            None => Display::fmt(&self.inner, fmt),
        }
    }
}

impl Fail for Error {
    fn cause(&self) -> Option<&dyn Fail> {
        self.inner.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.inner.backtrace()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            op: None,
            inner: Context::new(kind),
        }
    }
}

impl From<Context<ErrorKind>> for Error {
    fn from(inner: Context<ErrorKind>) -> Error {
        Error { op: None, inner }
    }
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Error {
        err.context(ErrorKind::Store).into()
    }
}

impl From<diesel::r2d2::PoolError> for Error {
    fn from(err: diesel::r2d2::PoolError) -> Error {
        err.context(ErrorKind::Store).into()
    }
}

impl From<diesel_migrations::RunMigrationsError> for Error {
    fn from(err: diesel_migrations::RunMigrationsError) -> Error {
        err.context(ErrorKind::Store).into()
    }
}
