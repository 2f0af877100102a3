use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Opaque external capability (registered device or render target).
///
/// The engine only checks presence and reads the identity; it never looks
/// inside.
pub trait OpaqueHandle: Send + Sync {
    fn handle_id(&self) -> &str;
}

/// Handle carrying nothing but its identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedHandle(pub String);

impl OpaqueHandle for NamedHandle {
    fn handle_id(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Default)]
pub struct DeviceRegistry {
    devices: BTreeMap<String, Arc<dyn OpaqueHandle>>,
}

impl DeviceRegistry {
    /// Registers `device` under `name`, returning the handle it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        device: Arc<dyn OpaqueHandle>,
    ) -> Option<Arc<dyn OpaqueHandle>> {
        self.devices.insert(name.into(), device)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn OpaqueHandle>> {
        self.devices.get(name)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.devices.iter().map(|(name, device)| (name, device.handle_id())))
            .finish()
    }
}
