//! Plain-text helpers shared by the editor and statistics paths.

pub mod word_count;
