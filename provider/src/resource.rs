use instatus_core::InstatusClient;

use crate::data::ResourceData;
use crate::diagnostics::Diagnostics;
use crate::error::ProviderError;
use crate::schema::Schema;

/// Lifecycle callbacks for one managed resource type.
///
/// Each callback reads desired attributes from `data`, calls the API and
/// writes the result back into `data`. On error `data` is left as it was,
/// apart from attributes already echoed by a successful request.
pub trait Resource: Send + Sync {
    /// Name used in configuration, e.g. `instatus_page`.
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Sets the identifier on success.
    fn create(&self, client: &InstatusClient, data: &mut ResourceData) -> Result<Diagnostics, ProviderError>;

    /// Refreshes attributes from the remote object. Clears the identifier
    /// when the object no longer exists.
    fn read(&self, client: &InstatusClient, data: &mut ResourceData) -> Result<Diagnostics, ProviderError>;

    fn update(&self, client: &InstatusClient, data: &mut ResourceData) -> Result<Diagnostics, ProviderError>;

    fn delete(&self, client: &InstatusClient, data: &mut ResourceData) -> Result<Diagnostics, ProviderError>;

    /// Builds full state from an externally supplied identifier.
    fn import(&self, client: &InstatusClient, id: &str) -> Result<ResourceData, ProviderError> {
        let _ = (client, id);
        Err(ProviderError::ImportUnsupported(self.type_name()))
    }
}
