use std::fs;
use std::io::ErrorKind;

use serde::Serialize;
use serde::de::DeserializeOwned;
use toml_edit::{DocumentMut, Item};

use crate::io::atomic_write_str;
use crate::paths::{ConfigError, TrovePaths};

/// Acceso por secciones (`[storage]`, `[logging]`...) a la configuración.
pub trait ConfigBackend {
  /// `Ok(None)` si el fichero o la sección no existen.
  fn load_section_opt<T: DeserializeOwned>(&self, section: &str) -> Result<Option<T>, ConfigError>;

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;

  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;

  fn load_section_or_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    Ok(self.load_section_opt(section)?.unwrap_or_default())
  }
}

/// Backend sobre `trove.toml`. Las escrituras usan `toml_edit` para conservar
/// comentarios y el resto de secciones.
#[derive(Debug, Clone)]
pub struct TomlConfigBackend {
  paths: TrovePaths,
}

impl TomlConfigBackend {
  pub fn new(paths: TrovePaths) -> Self {
    Self { paths }
  }

  pub fn paths(&self) -> &TrovePaths {
    &self.paths
  }

  fn read_document(&self) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(self.paths.config_file()) {
      Ok(content) => Ok(Some(content)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section_opt<T: DeserializeOwned>(&self, section: &str) -> Result<Option<T>, ConfigError> {
    let Some(content) = self.read_document()? else {
      return Ok(None);
    };

    let toml_val: toml::Value = toml::from_str(&content)?;
    let Some(table) = toml_val.get(section) else {
      return Ok(None);
    };

    let t: T = table
      .clone()
      .try_into()
      .map_err(|source| ConfigError::Decode { section: section.to_string(), source })?;
    Ok(Some(t))
  }

  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    self.load_section_opt(section)?.ok_or_else(|| ConfigError::MissingSection {
      section: section.to_string(),
      path: self.paths.config_file(),
    })
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let mut doc: DocumentMut = match self.read_document()? {
      Some(content) => content.parse::<DocumentMut>()?,
      None => DocumentMut::new(),
    };

    // `toml::to_string` produce las claves de la sección sin cabecera; se
    // vuelve a parsear como documento para insertarlo como tabla.
    let section_str = toml::to_string(value)?;
    let section_item: Item = section_str.parse::<DocumentMut>()?.into_item();

    doc[section] = section_item;
    atomic_write_str(&self.paths.config_file(), &doc.to_string())?;
    Ok(())
  }
}
