//! C# source loading: a lexer, a structural parser, and the loader that
//! turns a module's domain project into a symbol table.

mod lexer;
mod loader;
mod parser;

pub use loader::CSharpSourceLoader;
