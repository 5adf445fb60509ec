pub mod response;
pub mod samples;
