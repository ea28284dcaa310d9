//! Consumable schema built from introspection JSON
use crate::diagnostics::PrintableMessage;
use self::field::Field;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::io::Read;

pub mod field;
mod json;

pub type Documentation = Option<String>;
pub type FieldsLookup = HashMap<String, Field>;

#[derive(Debug)]
pub enum Error {
    MissingTypeOfForList,
    MissingTypeOfForNonNull,
    MissingNameForField,
    EnumMissingValues(String),
    UnknownType { name: String, kind: String },
    JsonParse(serde_json::Error),
}

impl From<Error> for PrintableMessage {
    fn from(error: Error) -> Self {
        match error {
            Error::MissingTypeOfForList => {
                PrintableMessage::new_simple_program_error("introspection list type missing `ofType`")
            }
            Error::MissingTypeOfForNonNull => PrintableMessage::new_simple_program_error(
                "introspection non-null type missing `ofType`",
            ),
            Error::MissingNameForField => {
                PrintableMessage::new_simple_program_error("introspection field type missing a name")
            }
            Error::EnumMissingValues(name) => PrintableMessage::new_simple_program_error(&format!(
                "introspection enum `{name}` has no values"
            )),
            Error::UnknownType { name, kind } => PrintableMessage::new_simple_program_error(
                &format!("unknown introspection kind `{kind}` for type `{name}`"),
            ),
            Error::JsonParse(parse_error) => PrintableMessage::new_simple_program_error(&format!(
                "malformed introspection JSON: {parse_error}"
            )),
        }
    }
}

#[derive(Debug)]
pub struct ObjectType {
    pub fields: FieldsLookup,
}

#[derive(Debug)]
pub struct InterfaceType {
    pub name: String,
    pub fields: FieldsLookup,
    pub possible_types: Vec<String>,
}

#[derive(Debug)]
pub struct UnionType {
    pub name: String,
    pub fields: FieldsLookup,
    pub possible_types: Vec<String>,
}

#[derive(Debug)]
pub struct EnumType {
    pub possible_values: Vec<String>,
}

#[derive(Debug)]
pub enum TypeDefinition {
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    Scalar(String),
    InputObject,
}

impl TypeDefinition {
    pub fn get_fields_lookup(&self) -> Option<&FieldsLookup> {
        match self {
            Self::Object(ObjectType { fields })
            | Self::Interface(InterfaceType { fields, .. })
            | Self::Union(UnionType { fields, .. }) => Some(fields),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Type {
    pub name: String,
    pub documentation: Documentation,
    pub definition: TypeDefinition,
}

impl Type {
    pub fn is_abstract(&self) -> bool {
        matches!(
            self.definition,
            TypeDefinition::Interface(_) | TypeDefinition::Union(_)
        )
    }
}

fn fields_lookup_from_json(fields_json: Option<Vec<json::Field>>) -> Result<FieldsLookup, Error> {
    let fields_json = fields_json.unwrap_or_default();
    let mut fields = HashMap::with_capacity(fields_json.len() + 1);
    for field_json in fields_json {
        let field = Field::try_from(field_json)?;
        fields.insert(field.name.clone(), field);
    }
    fields.insert("__typename".to_string(), Field::new_type_name());
    Ok(fields)
}

fn possible_type_names(stubs: Option<Vec<json::NamedTypeStub>>) -> Vec<String> {
    stubs
        .unwrap_or_default()
        .into_iter()
        .map(|stub| stub.name)
        .collect()
}

impl TryFrom<json::Type> for Type {
    type Error = Error;
    fn try_from(json: json::Type) -> Result<Self, Error> {
        let definition = match json.kind.as_ref() {
            "OBJECT" => TypeDefinition::Object(ObjectType {
                fields: fields_lookup_from_json(json.fields)?,
            }),
            "INTERFACE" => TypeDefinition::Interface(InterfaceType {
                name: json.name.clone(),
                fields: fields_lookup_from_json(json.fields)?,
                possible_types: possible_type_names(json.possible_types),
            }),
            "UNION" => TypeDefinition::Union(UnionType {
                name: json.name.clone(),
                // Unions carry no declared fields, but `__typename` is
                // always selectable on them.
                fields: fields_lookup_from_json(None)?,
                possible_types: possible_type_names(json.possible_types),
            }),
            "ENUM" => {
                let possible_values = json
                    .enum_values
                    .ok_or_else(|| Error::EnumMissingValues(json.name.clone()))?
                    .into_iter()
                    .map(|value| value.name)
                    .collect();
                TypeDefinition::Enum(EnumType { possible_values })
            }
            "SCALAR" => TypeDefinition::Scalar(json.name.clone()),
            "INPUT_OBJECT" => TypeDefinition::InputObject,
            _ => {
                return Err(Error::UnknownType {
                    name: json.name,
                    kind: json.kind,
                })
            }
        };
        Ok(Type {
            name: json.name,
            documentation: json.description,
            definition,
        })
    }
}

pub struct Schema {
    types: HashMap<String, Type>,
}

impl Schema {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let schema_json = json::Schema::try_from_reader(reader).map_err(Error::JsonParse)?;
        let mut types = HashMap::with_capacity(schema_json.types.len());
        for type_json in schema_json.types {
            let processed_type = Type::try_from(type_json)?;
            types.insert(processed_type.name.clone(), processed_type);
        }
        Ok(Schema { types })
    }

    pub fn get_type_for_name(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    /// The object types that can satisfy `of_type` at runtime. An object
    /// type is its own sole possibility.
    pub fn possible_concrete_types<'a>(&self, of_type: &'a Type) -> Vec<&'a str> {
        match &of_type.definition {
            TypeDefinition::Interface(InterfaceType { possible_types, .. })
            | TypeDefinition::Union(UnionType { possible_types, .. }) => {
                possible_types.iter().map(String::as_str).collect()
            }
            _ => vec![of_type.name.as_str()],
        }
    }

    /// Whether a fragment with the given type condition applies when the
    /// visited type is `visited_type_name`: the names match, or the visited
    /// type is one of the condition type's possible concrete types.
    pub fn spread_applies(&self, condition_name: &str, visited_type_name: &str) -> bool {
        if condition_name == visited_type_name {
            return true;
        }
        self.get_type_for_name(condition_name)
            .map(|condition_type| match &condition_type.definition {
                TypeDefinition::Interface(InterfaceType { possible_types, .. })
                | TypeDefinition::Union(UnionType { possible_types, .. }) => possible_types
                    .iter()
                    .any(|name| name == visited_type_name),
                _ => false,
            })
            .unwrap_or(false)
    }
}
