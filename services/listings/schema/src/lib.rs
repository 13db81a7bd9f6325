pub mod listing_code_sequences;
pub mod listings;
