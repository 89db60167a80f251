use schemars::JsonSchema;
use serde_json::Value;
use std::any::type_name;

/// Build the function-calling `parameters` schema for a tool's argument type.
///
/// The root `$schema` and `title` keys are dropped; function-calling APIs only
/// want the object description.
pub fn parameters_schema_for<T: JsonSchema>() -> Value {
    let root = schemars::schema_for!(T);
    let mut schema = serde_json::to_value(root).unwrap_or_else(|err| {
        panic!(
            "failed to serialize parameter schema for {}: {}",
            type_name::<T>(),
            err
        )
    });

    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
    }

    schema
}
