// Job postings: browse, post, edit, and the one-time demo seed.

pub mod handlers;
pub mod seed;
pub mod validation;
