//! Registry mapping modem models to driver factories.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, warn};

use super::vendors;
use super::{HANDSHAKE_COMMAND, IDENTIFY_COMMAND, ModemDriver};
use crate::channel::{AtChannel, Response};
use crate::error::{RegistryError, Result};

/// Creates a driver bound to the given AT channel.
pub type DriverFactory = Arc<dyn Fn(AtChannel) -> Box<dyn ModemDriver> + Send + Sync>;

/// Registry of driver factories keyed by model.
///
/// Keys are stored trimmed and upper-cased. An identification line resolves
/// to a key that equals it, or failing that, to a key it contains.
#[derive(Default, Clone)]
pub struct DriverRegistry {
    drivers: IndexMap<String, DriverFactory>,
}

impl DriverRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            drivers: IndexMap::new(),
        }
    }

    /// Create a registry with the built-in drivers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(vendors::zte::MODEL, |at| {
            Box::new(vendors::zte::ZteMf710Driver::new(at))
        });
        registry
    }

    /// Register a driver factory for a model.
    ///
    /// Registering an existing model replaces its factory. A blank model is
    /// ignored.
    pub fn register<F>(&mut self, model: &str, factory: F)
    where
        F: Fn(AtChannel) -> Box<dyn ModemDriver> + Send + Sync + 'static,
    {
        self.register_factory(model, Arc::new(factory));
    }

    /// Register an already shared factory.
    pub fn register_factory(&mut self, model: &str, factory: DriverFactory) {
        let key = normalize_key(model);
        if key.is_empty() {
            warn!("ignoring driver registration with blank model");
            return;
        }
        debug!("registering driver for model {}", key);
        self.drivers.insert(key, factory);
    }

    /// Check if a model is registered.
    pub fn contains(&self, model: &str) -> bool {
        self.drivers.contains_key(&normalize_key(model))
    }

    /// List registered models in registration order.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.drivers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    /// Resolve a driver factory from identification response lines.
    ///
    /// The model line is the first line that is not blank, `OK` or the
    /// echoed `ATI`. An exact key match wins; otherwise the longest key
    /// contained in the model line is used, earliest registration first on
    /// equal length.
    pub fn resolve<S: AsRef<str>>(&self, lines: &[S]) -> Result<DriverFactory> {
        let model_line = model_line(lines).ok_or_else(|| RegistryError::UnresolvableModel {
            lines: lines.iter().map(|l| l.as_ref().to_string()).collect(),
        })?;
        let normalized = model_line.to_uppercase();

        if let Some(factory) = self.drivers.get(&normalized) {
            debug!("model {:?} matched driver {} exactly", model_line, normalized);
            return Ok(factory.clone());
        }

        let mut best: Option<(&String, &DriverFactory)> = None;
        for (key, factory) in &self.drivers {
            if normalized.contains(key.as_str()) && best.is_none_or(|(b, _)| key.len() > b.len()) {
                best = Some((key, factory));
            }
        }

        match best {
            Some((key, factory)) => {
                debug!("model {:?} matched driver {} by substring", model_line, key);
                Ok(factory.clone())
            }
            None => Err(RegistryError::NoDriverRegistered {
                model: model_line.to_string(),
            }
            .into()),
        }
    }

    /// Probe the modem with `AT` and `ATI`, then resolve its driver.
    pub async fn probe(&self, at: &mut AtChannel) -> Result<DriverFactory> {
        let handshake = at.send_command(HANDSHAKE_COMMAND).await;
        require_ok(HANDSHAKE_COMMAND, &handshake)?;

        let identity = at.send_command(IDENTIFY_COMMAND).await;
        require_ok(IDENTIFY_COMMAND, &identity)?;

        self.resolve(identity.lines())
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("models", &self.drivers.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn normalize_key(model: &str) -> String {
    model.trim().to_uppercase()
}

fn model_line<S: AsRef<str>>(lines: &[S]) -> Option<&str> {
    lines.iter().map(|l| l.as_ref().trim()).find(|line| {
        !line.is_empty()
            && !line.eq_ignore_ascii_case("OK")
            && !line.eq_ignore_ascii_case(IDENTIFY_COMMAND)
    })
}

fn require_ok(command: &str, response: &Response) -> Result<()> {
    if response.is_ok() {
        return Ok(());
    }
    Err(RegistryError::ProbeFailed {
        command: command.to_string(),
        response: response.joined(" "),
    }
    .into())
}
