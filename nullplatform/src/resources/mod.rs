pub mod common;
pub mod dimension;
pub mod metadata_specification;
pub mod parameter;
pub mod parameter_value;
pub mod rest;

use tfplug::Resource;

use crate::api::Client;

pub use common::{resolve_nrn, NrnComponents, ResourceError};
pub use parameter::ParameterResource;
pub use parameter_value::ParameterValueResource;
pub use rest::RestResource;

/// Every resource type the provider serves
pub const RESOURCE_TYPES: [&str; 4] = [
    parameter::TYPE_NAME,
    parameter_value::TYPE_NAME,
    dimension::TYPE_NAME,
    metadata_specification::TYPE_NAME,
];

/// Instantiate a resource by type name
pub fn create(type_name: &str, client: Client) -> Option<Box<dyn Resource>> {
    let resource: Box<dyn Resource> = match type_name {
        parameter::TYPE_NAME => Box::new(ParameterResource::new(client)),
        parameter_value::TYPE_NAME => Box::new(ParameterValueResource::new(client)),
        dimension::TYPE_NAME => Box::new(RestResource::new(dimension::mapping(), client)),
        metadata_specification::TYPE_NAME => {
            Box::new(RestResource::new(metadata_specification::mapping(), client))
        }
        _ => return None,
    };
    Some(resource)
}

/// Schema of a resource type, without needing a configured client
pub fn schema(type_name: &str) -> Option<tfplug::Schema> {
    match type_name {
        parameter::TYPE_NAME => Some(ParameterResource::schema_static()),
        parameter_value::TYPE_NAME => Some(ParameterValueResource::schema_static()),
        dimension::TYPE_NAME => Some(dimension::mapping().schema()),
        metadata_specification::TYPE_NAME => Some(metadata_specification::mapping().schema()),
        _ => None,
    }
}
