pub mod application;
pub mod parameter;

use tfplug::DataSource;

use crate::api::Client;

pub use application::ApplicationDataSource;
pub use parameter::ParameterDataSource;

/// Every data source type the provider serves
pub const DATA_SOURCE_TYPES: [&str; 2] = [parameter::TYPE_NAME, application::TYPE_NAME];

/// Instantiate a data source by type name
pub fn create(type_name: &str, client: Client) -> Option<Box<dyn DataSource>> {
    match type_name {
        parameter::TYPE_NAME => Some(Box::new(ParameterDataSource::new(client))),
        application::TYPE_NAME => Some(Box::new(ApplicationDataSource::new(client))),
        _ => None,
    }
}

/// Schema of a data source type, without needing a configured client
pub fn schema(type_name: &str) -> Option<tfplug::Schema> {
    match type_name {
        parameter::TYPE_NAME => Some(ParameterDataSource::schema_static()),
        application::TYPE_NAME => Some(ApplicationDataSource::schema_static()),
        _ => None,
    }
}
