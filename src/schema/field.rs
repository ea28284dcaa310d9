use super::{json, Documentation, Error};
use std::convert::TryFrom;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarType {
    Custom(String),
    Boolean,
    String,
    Float,
    Int,
    ID,
}

impl From<&str> for ScalarType {
    fn from(name: &str) -> Self {
        match name {
            "Boolean" => ScalarType::Boolean,
            "String" => ScalarType::String,
            "Float" => ScalarType::Float,
            "Int" => ScalarType::Int,
            "ID" => ScalarType::ID,
            _ => ScalarType::Custom(name.to_string()),
        }
    }
}

/// One wrapping layer around a concrete field type, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeModifier {
    NonNull,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Object,
    Interface,
    Union,
    Enum,
    Scalar(ScalarType),
    InputObject,
    TypeName,
}

impl TypeKind {
    /// Composite kinds carry their own selection sets downstream.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object | Self::Interface | Self::Union)
    }
}

#[derive(Debug)]
pub struct FieldType {
    /// The unwrapped, named type at the bottom of the modifier chain.
    pub name: String,
    pub kind: TypeKind,
    pub modifiers: Vec<TypeModifier>,
}

impl FieldType {
    fn new_type_name() -> Self {
        FieldType {
            name: "__typename".to_string(),
            kind: TypeKind::TypeName,
            modifiers: vec![TypeModifier::NonNull],
        }
    }

    pub fn is_composite(&self) -> bool {
        self.kind.is_composite()
    }

    pub fn is_nullable(&self) -> bool {
        !matches!(self.modifiers.first(), Some(TypeModifier::NonNull))
    }
}

impl TryFrom<json::FieldType> for FieldType {
    type Error = Error;
    fn try_from(json: json::FieldType) -> Result<Self, Error> {
        let mut modifiers = Vec::new();
        let mut iter = json;
        loop {
            let name = match iter.kind.as_ref() {
                "NON_NULL" => {
                    iter = *iter.of_type.ok_or(Error::MissingTypeOfForNonNull)?;
                    modifiers.push(TypeModifier::NonNull);
                    continue;
                }
                "LIST" => {
                    iter = *iter.of_type.ok_or(Error::MissingTypeOfForList)?;
                    modifiers.push(TypeModifier::List);
                    continue;
                }
                _ => iter.name.ok_or(Error::MissingNameForField)?,
            };
            let kind = match iter.kind.as_ref() {
                "OBJECT" => TypeKind::Object,
                "INTERFACE" => TypeKind::Interface,
                "UNION" => TypeKind::Union,
                "ENUM" => TypeKind::Enum,
                "SCALAR" => TypeKind::Scalar(ScalarType::from(name.as_ref())),
                "INPUT_OBJECT" => TypeKind::InputObject,
                _ => {
                    return Err(Error::UnknownType {
                        name,
                        kind: iter.kind,
                    })
                }
            };
            return Ok(FieldType {
                name,
                kind,
                modifiers,
            });
        }
    }
}

#[derive(Debug)]
pub struct Field {
    pub name: String,
    pub documentation: Documentation,
    pub deprecated: bool,
    pub type_description: FieldType,
}

impl Field {
    pub(super) fn new_type_name() -> Self {
        Field {
            name: "__typename".to_string(),
            documentation: None,
            deprecated: false,
            type_description: FieldType::new_type_name(),
        }
    }
}

impl TryFrom<json::Field> for Field {
    type Error = Error;
    fn try_from(json: json::Field) -> Result<Self, Error> {
        let json::Field {
            type_information,
            name,
            description,
            deprecated,
        } = json;
        Ok(Field {
            name,
            documentation: description.map(|docs| {
                docs.lines()
                    .map(|line| line.trim())
                    .filter(|line| !line.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n")
            }),
            deprecated: deprecated.unwrap_or(false),
            type_description: FieldType::try_from(type_information)?,
        })
    }
}
