use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Formato físico o editorial en que se publicó un lanzamiento.
///
/// Permite valores no estándar mediante [`ReleaseFormat::Custom`], de modo
/// que parsear nunca falla.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReleaseFormat {
  #[default]
  CD,
  Vinyl,
  Cassette,
  Digital,
  /// Extended Play: más corto que un álbum, más largo que un single.
  EP,
  Single,
  /// Recopilación de pistas de varios lanzamientos.
  Compilation,
  Custom(String),
}

impl FromStr for ReleaseFormat {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized = s.trim().to_lowercase();

    let format = match normalized.as_str() {
      "cd" | "album/cd" | "compact disc" => ReleaseFormat::CD,
      "lp" | "vinyl" | "2lp" => ReleaseFormat::Vinyl,
      "cassette" | "mc" | "tape" => ReleaseFormat::Cassette,
      "digital" | "download" | "stream" => ReleaseFormat::Digital,
      "ep" => ReleaseFormat::EP,
      "single" => ReleaseFormat::Single,
      "compilation" => ReleaseFormat::Compilation,
      _ => ReleaseFormat::Custom(s.trim().to_string()),
    };

    Ok(format)
  }
}

impl fmt::Display for ReleaseFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseFormat::CD => write!(f, "CD"),
      ReleaseFormat::Vinyl => write!(f, "Vinyl"),
      ReleaseFormat::Cassette => write!(f, "Cassette"),
      ReleaseFormat::Digital => write!(f, "Digital"),
      ReleaseFormat::EP => write!(f, "EP"),
      ReleaseFormat::Single => write!(f, "Single"),
      ReleaseFormat::Compilation => write!(f, "Compilation"),
      ReleaseFormat::Custom(s) => write!(f, "{s}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_formats_are_normalized() {
    assert_eq!("  LP ".parse::<ReleaseFormat>().unwrap(), ReleaseFormat::Vinyl);
    assert_eq!("Album/CD".parse::<ReleaseFormat>().unwrap(), ReleaseFormat::CD);
  }

  #[test]
  fn unknown_formats_are_kept_verbatim() {
    let format = "Blu-ray Audio".parse::<ReleaseFormat>().unwrap();
    assert_eq!(format, ReleaseFormat::Custom("Blu-ray Audio".into()));
    assert_eq!(format.to_string(), "Blu-ray Audio");
  }
}
