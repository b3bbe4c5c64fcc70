//! Parameter schema model for tool declarations
//!
//! Tools declare their arguments as a small schema tree. Two visitors
//! walk the tree: one lowers it to the JSON Schema object the completion
//! API expects, the other validates incoming arguments and collects the
//! paths of offending fields.

use serde_json::{json, Map, Value};

/// Named field of an object schema
#[derive(Debug, Clone)]
pub struct ObjectField {
    /// Key in the arguments object
    pub name: String,
    /// Schema of the value
    pub schema: ParamSchema,
}

/// Kind of a schema node
#[derive(Debug, Clone)]
pub enum ParamKind {
    /// UTF-8 string
    String,
    /// JSON number, integer or float
    Number,
    /// Boolean
    Boolean,
    /// Homogeneous array
    Array(Box<ParamSchema>),
    /// Object with a fixed set of declared fields
    Object(Vec<ObjectField>),
}

/// Schema of a tool parameter, or of the whole argument object
#[derive(Debug, Clone)]
pub struct ParamSchema {
    /// Node kind
    pub kind: ParamKind,
    /// Description surfaced to the model
    pub description: Option<String>,
    /// Whether the value may be absent or null
    pub optional: bool,
    /// Minimum number of elements; arrays only
    pub min_items: Option<usize>,
}

impl ParamSchema {
    fn new(kind: ParamKind) -> Self {
        Self {
            kind,
            description: None,
            optional: false,
            min_items: None,
        }
    }

    /// String parameter
    #[must_use]
    pub fn string() -> Self {
        Self::new(ParamKind::String)
    }

    /// Number parameter
    #[must_use]
    pub fn number() -> Self {
        Self::new(ParamKind::Number)
    }

    /// Boolean parameter
    #[must_use]
    pub fn boolean() -> Self {
        Self::new(ParamKind::Boolean)
    }

    /// Array parameter with the given element schema
    #[must_use]
    pub fn array(items: ParamSchema) -> Self {
        Self::new(ParamKind::Array(Box::new(items)))
    }

    /// Object parameter with no fields yet; add them with [`field`](Self::field)
    #[must_use]
    pub fn object() -> Self {
        Self::new(ParamKind::Object(Vec::new()))
    }

    /// Add a field to an object schema
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: ParamSchema) -> Self {
        debug_assert!(matches!(self.kind, ParamKind::Object(_)));
        if let ParamKind::Object(fields) = &mut self.kind {
            fields.push(ObjectField {
                name: name.into(),
                schema,
            });
        }
        self
    }

    /// Set the description surfaced to the model
    #[must_use]
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Mark the value as optional; absent and null both pass validation
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Require at least `min` elements; arrays only
    #[must_use]
    pub fn min_items(mut self, min: usize) -> Self {
        debug_assert!(matches!(self.kind, ParamKind::Array(_)));
        self.min_items = Some(min);
        self
    }

    /// Dispatch to the visitor method for this node
    pub fn accept<V: SchemaVisitor>(&self, visitor: &mut V) -> V::Output {
        match &self.kind {
            ParamKind::String => visitor.visit_string(self),
            ParamKind::Number => visitor.visit_number(self),
            ParamKind::Boolean => visitor.visit_boolean(self),
            ParamKind::Array(items) => visitor.visit_array(self, items),
            ParamKind::Object(fields) => visitor.visit_object(self, fields),
        }
    }
}

/// Visitor over schema trees
pub trait SchemaVisitor {
    /// Value produced per node
    type Output;

    /// Visit a string node
    fn visit_string(&mut self, schema: &ParamSchema) -> Self::Output;

    /// Visit a number node
    fn visit_number(&mut self, schema: &ParamSchema) -> Self::Output;

    /// Visit a boolean node
    fn visit_boolean(&mut self, schema: &ParamSchema) -> Self::Output;

    /// Visit an array node
    fn visit_array(&mut self, schema: &ParamSchema, items: &ParamSchema) -> Self::Output;

    /// Visit an object node
    fn visit_object(&mut self, schema: &ParamSchema, fields: &[ObjectField]) -> Self::Output;
}

/// Lowers a schema tree to the JSON Schema object sent to the model
///
/// The `required` list holds the non-optional field names and is omitted
/// when empty.
#[derive(Debug, Default)]
pub struct JsonSchemaLowering;

impl JsonSchemaLowering {
    /// Lower a full schema tree
    #[must_use]
    pub fn lower(schema: &ParamSchema) -> Value {
        schema.accept(&mut JsonSchemaLowering)
    }

    fn describe(schema: &ParamSchema, mut value: Value) -> Value {
        if let Some(description) = &schema.description {
            if let Some(map) = value.as_object_mut() {
                map.insert(
                    "description".to_string(),
                    Value::String(description.clone()),
                );
            }
        }
        value
    }
}

impl SchemaVisitor for JsonSchemaLowering {
    type Output = Value;

    fn visit_string(&mut self, schema: &ParamSchema) -> Value {
        Self::describe(schema, json!({"type": "string"}))
    }

    fn visit_number(&mut self, schema: &ParamSchema) -> Value {
        Self::describe(schema, json!({"type": "number"}))
    }

    fn visit_boolean(&mut self, schema: &ParamSchema) -> Value {
        Self::describe(schema, json!({"type": "boolean"}))
    }

    fn visit_array(&mut self, schema: &ParamSchema, items: &ParamSchema) -> Value {
        let mut value = json!({"type": "array", "items": items.accept(self)});
        if let Some(min) = schema.min_items {
            value["minItems"] = json!(min);
        }
        Self::describe(schema, value)
    }

    fn visit_object(&mut self, schema: &ParamSchema, fields: &[ObjectField]) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in fields {
            properties.insert(field.name.clone(), field.schema.accept(self));
            if !field.schema.optional {
                required.push(Value::String(field.name.clone()));
            }
        }
        let mut value = json!({"type": "object", "properties": properties});
        if !required.is_empty() {
            value["required"] = Value::Array(required);
        }
        Self::describe(schema, value)
    }
}

/// Validates arguments against a schema tree
///
/// Collects the dotted paths of every offending field instead of stopping
/// at the first mismatch. Unknown fields are tolerated.
pub struct ArgumentValidator<'a> {
    current: &'a Value,
    path: String,
    offending: Vec<String>,
}

impl<'a> ArgumentValidator<'a> {
    /// Validate `args` against `schema`, returning the offending paths
    #[must_use]
    pub fn validate(schema: &ParamSchema, args: &'a Value) -> Vec<String> {
        let mut validator = Self {
            current: args,
            path: String::new(),
            offending: Vec::new(),
        };
        schema.accept(&mut validator);
        validator.offending
    }

    fn flag(&mut self) {
        let path = if self.path.is_empty() {
            "arguments".to_string()
        } else {
            self.path.clone()
        };
        self.offending.push(path);
    }
}

impl SchemaVisitor for ArgumentValidator<'_> {
    type Output = ();

    fn visit_string(&mut self, _schema: &ParamSchema) {
        if !self.current.is_string() {
            self.flag();
        }
    }

    fn visit_number(&mut self, _schema: &ParamSchema) {
        if !self.current.is_number() {
            self.flag();
        }
    }

    fn visit_boolean(&mut self, _schema: &ParamSchema) {
        if !self.current.is_boolean() {
            self.flag();
        }
    }

    fn visit_array(&mut self, schema: &ParamSchema, items: &ParamSchema) {
        let parent = self.current;
        let Some(elements) = parent.as_array() else {
            self.flag();
            return;
        };
        if let Some(min) = schema.min_items {
            if elements.len() < min {
                self.flag();
                return;
            }
        }
        let base = self.path.clone();
        for (index, element) in elements.iter().enumerate() {
            self.current = element;
            self.path = format!("{base}[{index}]");
            items.accept(self);
        }
        self.path = base;
        self.current = parent;
    }

    fn visit_object(&mut self, _schema: &ParamSchema, fields: &[ObjectField]) {
        let parent = self.current;
        let Some(map) = parent.as_object() else {
            self.flag();
            return;
        };
        let base = self.path.clone();
        for field in fields {
            self.path = if base.is_empty() {
                field.name.clone()
            } else {
                format!("{base}.{}", field.name)
            };
            match map.get(&field.name) {
                None | Some(Value::Null) => {
                    if !field.schema.optional {
                        self.flag();
                    }
                }
                Some(value) => {
                    self.current = value;
                    field.schema.accept(self);
                }
            }
        }
        self.path = base;
        self.current = parent;
    }
}
