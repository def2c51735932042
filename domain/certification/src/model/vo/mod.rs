mod creation;
mod query;

#[rustfmt::skip]
pub use {
    creation::*,
    query::*,
};
