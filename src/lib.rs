pub mod analyzers;
pub mod borough;
pub mod boundaries;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod period;
pub mod records;
pub mod translate;
