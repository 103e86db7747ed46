// src/services/prompt.rs

use serde_json::{Value, json};

use crate::services::generation::ContentSchema;

/// The example document the model is asked to fill in: the schema's example
/// item repeated `count` times under its array field.
pub fn response_template<S: ContentSchema + ?Sized>(schema: &S, count: u8) -> Value {
    let items: Vec<Value> = (0..count).map(|_| schema.example_item()).collect();
    let mut template = json!({});
    template[schema.field()] = Value::Array(items);
    template
}

/// Builds the single user message sent to the completion API.
///
/// Source text and user instructions are embedded verbatim.
pub fn build_prompt<S: ContentSchema + ?Sized>(
    schema: &S,
    source_text: &str,
    instructions: &str,
    count: u8,
) -> String {
    let template = serde_json::to_string_pretty(&response_template(schema, count))
        .unwrap_or_else(|_| "{}".to_string());

    format!(
        "Text: {source_text}\n\
         \n\
         User Instructions: {instructions}\n\
         \n\
         {task}\n\
         \n\
         Respond ONLY with JSON formatted like the example below, using it as a guide.\n\
         The \"{field}\" array must contain exactly {count} entries.\n\
         \n\
         {template}\n",
        task = schema.task(count, instructions),
        field = schema.field(),
    )
}
