//! nullplatform_dimension

use crate::mapping::{FieldKind, FieldSpec, RestMapping};

pub const TYPE_NAME: &str = "nullplatform_dimension";

pub fn mapping() -> RestMapping {
    RestMapping {
        type_name: TYPE_NAME,
        description: "Manages a dimension, a named axis used to scope parameter values",
        path: "/dimension",
        fields: vec![
            FieldSpec::new("name", FieldKind::String)
                .required()
                .description("Display name, e.g. Environment"),
            FieldSpec::new("nrn", FieldKind::String)
                .required()
                .force_new()
                .description("NRN the dimension is defined at"),
            FieldSpec::new("order", FieldKind::Integer)
                .optional_computed()
                .description("Position among the dimensions of the same NRN"),
            FieldSpec::new("slug", FieldKind::String)
                .computed()
                .description("Key used in parameter value dimension maps"),
            FieldSpec::new("status", FieldKind::String).computed(),
        ],
        status_field: Some("status"),
    }
}
