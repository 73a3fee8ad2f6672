//! Metadata schemas
//!
//! A schema is an ordered list of typed, named fields. Field order is part of
//! every hash computed against the schema, so a schema must not be reordered
//! once commitments exist for it.

use std::collections::HashSet;
use serde::{Serialize, Deserialize};
use log::debug;

use crate::codec::{encode_field, FieldType};
use crate::error::{CoreError, Result};
use crate::models::{MetadataRecord, EDITION_ID_FIELD, SERIAL_NUMBER_FIELD};

/// Named, typed slot within a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, used as the key into metadata records
    pub name: String,

    /// Scalar type of the field
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl Field {
    /// Create a new field
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Field {
            name: name.into(),
            field_type,
        }
    }
}

/// Ordered sequence of fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Field>", into = "Vec<Field>")]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Create a schema, rejecting empty field lists and duplicate names
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        if fields.is_empty() {
            return Err(CoreError::ConfigError("schema has no fields".to_string()));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(CoreError::ConfigError(format!(
                    "duplicate schema field `{}`",
                    field.name
                )));
            }
        }

        Ok(Schema { fields })
    }

    /// Schema of edition commitments: `editionId` then `serialNumber`
    pub fn edition() -> Self {
        Schema {
            fields: vec![
                Field::new(EDITION_ID_FIELD, FieldType::UInt64),
                Field::new(SERIAL_NUMBER_FIELD, FieldType::UInt64),
            ],
        }
    }

    /// Fields in declared order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encode every field of a record, in declared order
    ///
    /// Each buffer is self-delimiting, so the concatenation of the result is
    /// injective over the record's values. Values for names the schema does
    /// not declare are ignored. The first failing field aborts the encoding.
    pub fn encode_record(&self, record: &MetadataRecord) -> Result<Vec<Vec<u8>>> {
        let buffers = self
            .fields
            .iter()
            .map(|field| {
                let value = record.get(&field.name).ok_or_else(|| CoreError::MissingFieldError {
                    field: field.name.clone(),
                })?;
                encode_field(field.field_type, value).map_err(|e| e.in_field(&field.name))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Encoded record into {} fields ({} bytes)",
            buffers.len(),
            buffers.iter().map(Vec::len).sum::<usize>()
        );

        Ok(buffers)
    }
}

impl TryFrom<Vec<Field>> for Schema {
    type Error = CoreError;

    fn try_from(fields: Vec<Field>) -> Result<Self> {
        Schema::new(fields)
    }
}

impl From<Schema> for Vec<Field> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

/// Encode every field of a record against a schema
pub fn encode_record(schema: &Schema, record: &MetadataRecord) -> Result<Vec<Vec<u8>>> {
    schema.encode_record(record)
}
