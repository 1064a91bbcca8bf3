pub mod http;
#[cfg(test)]
pub mod memory;

use anyhow::Result;

use crate::domain::models::ServiceBox;

pub struct ServiceManager {}

impl ServiceManager {
    /// Builds the service client described by the loaded configuration.
    pub fn from_config() -> Result<ServiceBox> {
        return Ok(Box::new(http::HttpService::from_config()?));
    }
}
