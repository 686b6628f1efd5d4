pub mod relationship;
pub mod requests;
