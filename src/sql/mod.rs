//! SQL text generation helpers: identifier escaping and the where-clause
//! mini-language.

pub mod escape;
pub mod where_clause;

pub use escape::{escape_column_name, escape_table_name};
pub use where_clause::build_where;
