mod classify;
mod keywords;

pub use classify::{classify, Classification};
pub use keywords::match_keyword;
