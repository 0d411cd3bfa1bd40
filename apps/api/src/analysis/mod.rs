pub mod assembler;
pub mod extractor;
pub mod handlers;
pub mod intake;
pub mod models;
pub mod projector;
pub mod prompts;
pub mod report;
pub mod scores;
pub mod sectionizer;
