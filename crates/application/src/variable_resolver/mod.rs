//! Variable resolution module
//!
//! Provides parsing and substitution of `{{variable}}` syntax in strings
//! and across whole requests.
//!
//! # Usage
//!
//! ```
//! use querybox_application::variable_resolver::interpolate;
//! use querybox_domain::VariableMap;
//!
//! let mut vars = VariableMap::new();
//! vars.insert("host".to_string(), "localhost".to_string());
//!
//! assert_eq!(interpolate("http://{{host}}/{{path}}", &vars), "http://localhost/{{path}}");
//! ```

pub mod engine;
pub mod parser;

pub use engine::{interpolate, interpolate_request};
pub use parser::{VariableReference, extract_variable_names, has_variables, parse_variables};
