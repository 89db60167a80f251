pub mod schema;
pub mod validator;

pub use schema::parameters_schema_for;
pub use validator::{StrictValidator, Validator};
