// ABOUTME: Template resolution engine for mail merge tags
// ABOUTME: Locates {{..}} tags, evaluates field references and conditionals, rewrites strings

pub mod evaluator;
pub mod resolver;
pub mod scanner;

pub use evaluator::CompareOp;
pub use resolver::resolve;
pub use scanner::TagSpan;
