//! In-memory service catalog

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};
use weft_domain::error::{Error, Result};
use weft_domain::{CompositionContainer, CreationPolicy, Registration};

type Instance = Box<dyn Any + Send + Sync>;

/// Container of contract objects keyed by contract name
///
/// A contract may have several implementations; [`resolve`](Self::resolve)
/// hands out the one registered last. `Shared` and `Any` registrations are
/// created on first resolution and reused; `NonShared` ones are created on
/// every resolution.
#[derive(Default)]
pub struct ServiceCatalog {
    registrations: HashMap<String, Vec<Registration>>,
    shared: Mutex<HashMap<(String, String), Instance>>,
}

impl ServiceCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the object registered last for `contract`
    ///
    /// `T` is the contract's object type, e.g. `dyn Calculator + Send + Sync`.
    pub fn resolve<T>(&self, contract: &str) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let registration = self
            .registrations
            .get(contract)
            .and_then(|all| all.last())
            .ok_or_else(|| Error::not_found(format!("contract '{contract}'")))?;
        self.instance(registration)
    }

    /// Resolve every object registered for `contract`, in registration order
    pub fn resolve_all<T>(&self, contract: &str) -> Result<Vec<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.registrations
            .get(contract)
            .map(|all| all.iter().map(|r| self.instance(r)).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    /// Registrations of `contract`
    pub fn registrations(&self, contract: &str) -> &[Registration] {
        self.registrations
            .get(contract)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `contract` has at least one registration
    pub fn contains(&self, contract: &str) -> bool {
        self.registrations.contains_key(contract)
    }

    /// Registered contract names, sorted
    pub fn contracts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.registrations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registrations across all contracts
    pub fn len(&self) -> usize {
        self.registrations.values().map(Vec::len).sum()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn instance<T>(&self, registration: &Registration) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        if registration.policy == CreationPolicy::NonShared {
            let created = (registration.factory)()?;
            return downcast(registration, &created);
        }

        let key = (
            registration.contract.clone(),
            registration.implementation.clone(),
        );
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = shared.get(&key) {
            return downcast(registration, existing);
        }
        let created = (registration.factory)()?;
        let object = downcast(registration, &created)?;
        debug!(
            contract = %registration.contract,
            implementation = %registration.implementation,
            "Shared instance created"
        );
        shared.insert(key, created);
        Ok(object)
    }
}

fn downcast<T>(registration: &Registration, instance: &Instance) -> Result<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    (**instance).downcast_ref::<Arc<T>>().cloned().ok_or_else(|| {
        Error::registration(format!(
            "'{}' is registered for contract '{}' as another object type than {}",
            registration.implementation,
            registration.contract,
            std::any::type_name::<T>()
        ))
    })
}

impl CompositionContainer for ServiceCatalog {
    fn register(&mut self, registration: Registration) -> Result<()> {
        let existing = self
            .registrations
            .entry(registration.contract.clone())
            .or_default();
        if existing
            .iter()
            .any(|r| r.implementation == registration.implementation)
        {
            return Err(Error::registration(format!(
                "'{}' is already registered for contract '{}'",
                registration.implementation, registration.contract
            )));
        }
        info!(
            contract = %registration.contract,
            implementation = %registration.implementation,
            policy = ?registration.policy,
            "Registered woven service"
        );
        existing.push(registration);
        Ok(())
    }
}

impl std::fmt::Debug for ServiceCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCatalog")
            .field("contracts", &self.contracts())
            .field("registrations", &self.len())
            .finish_non_exhaustive()
    }
}
