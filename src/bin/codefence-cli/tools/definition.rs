use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use codefence::chat::{FunctionTool, ParameterProperty, ParametersSchema, Tool};

use super::context::ToolContext;
use super::error::ToolError;

pub type ToolExecutor = Arc<dyn Fn(&ToolContext, Value) -> Result<String, ToolError> + Send + Sync>;

/// One registered tool: its advertised schema plus its implementation.
#[derive(Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ToolParam>,
    pub required: Vec<&'static str>,
    pub executor: ToolExecutor,
}

#[derive(Clone)]
pub struct ToolParam {
    pub name: &'static str,
    pub description: &'static str,
    pub param_type: &'static str,
    /// For array types, the item type.
    pub items: Option<&'static str>,
}

impl ToolParam {
    /// Create a simple parameter.
    pub const fn simple(
        name: &'static str,
        description: &'static str,
        param_type: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            param_type,
            items: None,
        }
    }

    /// Create an array parameter with item type.
    pub const fn array(
        name: &'static str,
        description: &'static str,
        item_type: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            param_type: "array",
            items: Some(item_type),
        }
    }
}

impl ToolDefinition {
    /// Render this definition into the declaration advertised to the model.
    pub fn declaration(&self) -> Tool {
        let mut properties = HashMap::new();
        for param in &self.params {
            properties.insert(
                param.name.to_string(),
                ParameterProperty {
                    property_type: param.param_type.to_string(),
                    description: param.description.to_string(),
                    items: param.items.map(|item_type| {
                        Box::new(ParameterProperty {
                            property_type: item_type.to_string(),
                            description: String::new(),
                            items: None,
                        })
                    }),
                },
            );
        }
        let schema = ParametersSchema {
            schema_type: "object".to_string(),
            properties,
            required: self.required.iter().map(ToString::to_string).collect(),
        };
        Tool {
            tool_type: "function".to_string(),
            function: FunctionTool {
                name: self.name.to_string(),
                description: self.description.to_string(),
                parameters: serde_json::to_value(&schema).unwrap_or(Value::Null),
            },
        }
    }
}
