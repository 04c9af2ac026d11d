pub mod bounds;
pub mod llm;
pub mod logging;
