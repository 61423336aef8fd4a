//! reviewroster
//! ============
//!
//! Assigns code reviewers to pull requests within a team, and tracks each pull request from
//! creation to merge.
//!
//! When a pull request is created, up to two active members of the author's team are picked at
//! random to review it. A single reviewer can later be swapped for another eligible teammate, and
//! merging is idempotent. Everything is kept in Postgres; the service holds no state of its own
//! between requests.
//!
//! Hacking
//! -------
//!
//! This follows the approach laid out in
//! ["Stateless MVC"](https://www.tedinski.com/2018/09/11/stateless-mvc.html). Ignore the "Should
//! you use this design?" section...
#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    // unused_qualifications,
    unused_results,
    while_true
)]

#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

#[macro_use]
pub mod util;

pub mod dal;
pub mod error;
pub mod logic;
pub mod router;
pub mod schema;
