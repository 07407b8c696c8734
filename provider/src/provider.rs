//! Entry point the host talks to.
//!
//! `Provider` owns the shared client and the registered resource types, and
//! wraps every callback with schema validation and lifecycle bookkeeping so
//! individual resources only deal with API mapping.

use std::collections::BTreeMap;

use instatus_core::InstatusClient;
use log::info;

use crate::config::ProviderConfig;
use crate::data::ResourceData;
use crate::diagnostics::Diagnostics;
use crate::error::ProviderError;
use crate::lifecycle::{InstanceState, Operation};
use crate::resource::Resource;
use crate::resources::{ComponentResource, PageResource};
use crate::schema::Schema;

pub struct Provider {
    client: InstatusClient,
    resources: BTreeMap<&'static str, Box<dyn Resource>>,
}

impl Provider {
    /// Provider with the built-in resource types registered.
    pub fn new(client: InstatusClient) -> Self {
        let mut provider = Self {
            client,
            resources: BTreeMap::new(),
        };
        provider.register(Box::new(PageResource));
        provider.register(Box::new(ComponentResource));
        provider
    }

    pub fn configure(config: &ProviderConfig) -> Self {
        info!("configuring Instatus provider: {config:?}");
        Self::new(InstatusClient::new(config.client_config()))
    }

    pub fn register(&mut self, resource: Box<dyn Resource>) {
        self.resources.insert(resource.type_name(), resource);
    }

    pub fn client(&self) -> &InstatusClient {
        &self.client
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    pub fn schema(&self, type_name: &str) -> Result<Schema, ProviderError> {
        Ok(self.resource(type_name)?.schema())
    }

    fn resource(&self, type_name: &str) -> Result<&dyn Resource, ProviderError> {
        self.resources
            .get(type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownResourceType(type_name.to_string()))
    }

    /// Validate desired attributes and mark the instance as planned.
    pub fn plan(&self, type_name: &str, data: &mut ResourceData) -> Result<(), ProviderError> {
        let resource = self.resource(type_name)?;
        let next = data.state().transition(Operation::Plan)?;
        resource.schema().validate(data)?;
        data.set_state(next);
        Ok(())
    }

    pub fn create(&self, type_name: &str, data: &mut ResourceData) -> Result<Diagnostics, ProviderError> {
        let resource = self.resource(type_name)?;
        let next = data.state().transition(Operation::Create)?;
        resource.schema().validate(data)?;

        let diags = resource.create(&self.client, data)?;
        data.set_state(next);
        info!("created {type_name} {}", data.id().unwrap_or("<no id>"));
        Ok(diags)
    }

    /// Refresh state. An instance whose remote object is gone becomes absent.
    pub fn read(&self, type_name: &str, data: &mut ResourceData) -> Result<Diagnostics, ProviderError> {
        let resource = self.resource(type_name)?;
        let next = data.state().transition(Operation::Read)?;

        let diags = resource.read(&self.client, data)?;
        if data.id().is_none() {
            info!("{type_name} disappeared remotely");
            data.set_state(InstanceState::Absent);
        } else {
            data.set_state(next);
        }
        Ok(diags)
    }

    pub fn update(&self, type_name: &str, data: &mut ResourceData) -> Result<Diagnostics, ProviderError> {
        let resource = self.resource(type_name)?;
        let next = data.state().transition(Operation::Update)?;
        resource.schema().validate(data)?;

        let diags = resource.update(&self.client, data)?;
        data.set_state(next);
        info!("updated {type_name} {}", data.id().unwrap_or("<no id>"));
        Ok(diags)
    }

    /// Mark a present instance for replacement.
    pub fn taint(&self, data: &mut ResourceData) -> Result<(), ProviderError> {
        let next = data.state().transition(Operation::Taint)?;
        data.set_state(next);
        Ok(())
    }

    pub fn delete(&self, type_name: &str, data: &mut ResourceData) -> Result<Diagnostics, ProviderError> {
        let resource = self.resource(type_name)?;
        let next = data.state().transition(Operation::Delete)?;
        let id = data.id().unwrap_or("<no id>").to_string();

        let diags = resource.delete(&self.client, data)?;
        data.clear_id();
        data.set_state(next);
        info!("deleted {type_name} {id}");
        Ok(diags)
    }

    pub fn import(&self, type_name: &str, id: &str) -> Result<ResourceData, ProviderError> {
        let resource = self.resource(type_name)?;
        let next = InstanceState::Absent.transition(Operation::Import)?;

        let mut data = resource.import(&self.client, id)?;
        data.set_state(next);
        info!("imported {type_name} {id}");
        Ok(data)
    }
}
