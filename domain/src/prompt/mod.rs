//! Fixed prompt texts for the ticket lifecycle

mod template;

pub use template::PromptTemplate;
