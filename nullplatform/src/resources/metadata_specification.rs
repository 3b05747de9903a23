//! nullplatform_metadata_specification

use crate::mapping::{FieldKind, FieldSpec, RestMapping};

pub const TYPE_NAME: &str = "nullplatform_metadata_specification";

pub fn mapping() -> RestMapping {
    RestMapping {
        type_name: TYPE_NAME,
        description: "Manages a JSON schema describing the metadata of an entity type",
        path: "/metadata/metadata_specification",
        fields: vec![
            FieldSpec::new("name", FieldKind::String).required(),
            FieldSpec::new("description", FieldKind::String),
            FieldSpec::new("nrn", FieldKind::String)
                .required()
                .force_new(),
            FieldSpec::new("entity", FieldKind::String)
                .required()
                .force_new()
                .description("Entity type the metadata belongs to, e.g. application"),
            FieldSpec::new("metadata", FieldKind::String)
                .required()
                .force_new()
                .description("Metadata key the schema validates"),
            FieldSpec::new("schema", FieldKind::Json)
                .required()
                .description("JSON schema document, as a JSON-encoded string"),
        ],
        status_field: None,
    }
}
