//! Forms module - schemas, the registry that holds them, and answer validation.

mod catalogue;
mod field;
mod registry;
mod schema;
mod validator;

pub use catalogue::builtin_schemas;
pub use field::{FieldDefinition, FieldType};
pub use registry::{RegistryError, SchemaRegistry};
pub use schema::{BoundSchema, FormMetadata, FormSchema, FormSchemaSpec, FormSummary};
pub use validator::{validate, ValidationOutcome};
