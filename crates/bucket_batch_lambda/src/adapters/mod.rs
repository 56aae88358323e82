pub mod bucket_store;
pub mod response_sender;
