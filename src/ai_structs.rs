use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structured output requested from the model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct SuggestedFileName {
    #[schemars(
        description = "The generated filename, starting with YYYY-MM-DD, followed by an underscore and the subject/title, and ending with the correct extension."
    )]
    pub filename: String,
    #[schemars(description = "Brief explanation of why this name was chosen.")]
    pub reasoning: String,
}

/// JSON schema sent as `responseJsonSchema`, without the meta keys the API rejects.
pub fn suggested_file_name_schema() -> serde_json::Value {
    let mut schema = serde_json::Value::from(schemars::schema_for!(SuggestedFileName));
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
        object.remove("title");
    }
    schema
}
