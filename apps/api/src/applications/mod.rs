// Candidate applications: apply with a PDF resume, track, review, download.

pub mod handlers;
pub mod resume;
pub mod storage;
