use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use ac_thermostat_common::{ConfigStore, RuntimeConfig, StoreError, ThermostatConfig};
use serde_json::{Map, Value};
use tracing::{debug, warn};

const RUNTIME_FILE: &str = "runtime.json";
const THERMOSTAT_KEY: &str = "thermostat";

/// Keeps the `thermostat` section of `runtime.json` in sync with the engine,
/// leaving the rest of the document untouched.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    runtime_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            runtime_path: data_dir.as_ref().join(RUNTIME_FILE),
        }
    }

    pub fn from_env() -> Self {
        let data_dir = std::env::var("THERMOSTAT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./.thermostat"));
        Self::new(data_dir)
    }

    pub fn runtime_path(&self) -> &Path {
        &self.runtime_path
    }

    pub fn load_runtime(&self) -> Result<RuntimeConfig, StoreError> {
        match self.read_document()? {
            Some(document) => Ok(serde_json::from_value(document)?),
            None => Ok(RuntimeConfig::default()),
        }
    }

    fn read_document(&self) -> Result<Option<Value>, StoreError> {
        match fs::read(&self.runtime_path) {
            Ok(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    // Write-then-rename so a crash never leaves a truncated file behind.
    fn write_document(&self, document: &Value) -> Result<(), StoreError> {
        if let Some(parent) = self.runtime_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.runtime_path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_vec_pretty(document)?)?;
        fs::rename(&tmp_path, &self.runtime_path)?;
        Ok(())
    }
}

impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<Option<ThermostatConfig>, StoreError> {
        let Some(mut document) = self.read_document()? else {
            return Ok(None);
        };
        match document.get_mut(THERMOSTAT_KEY).map(Value::take) {
            None | Some(Value::Null) => Ok(None),
            Some(section) => Ok(Some(serde_json::from_value(section)?)),
        }
    }

    fn save(&mut self, config: &ThermostatConfig) -> Result<(), StoreError> {
        let mut document = match self.read_document() {
            Ok(Some(Value::Object(map))) => map,
            Ok(_) => Map::new(),
            Err(StoreError::Serde(err)) => {
                warn!(
                    "replacing unreadable {}: {err}",
                    self.runtime_path.display()
                );
                Map::new()
            }
            Err(err) => return Err(err),
        };
        document.insert(THERMOSTAT_KEY.to_string(), serde_json::to_value(config)?);
        self.write_document(&Value::Object(document))?;
        debug!("thermostat config saved to {}", self.runtime_path.display());
        Ok(())
    }
}
