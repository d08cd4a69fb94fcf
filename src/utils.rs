use anyhow::{bail, Result};

pub mod error;
pub mod jwt;

/// Parses an on/off switch from configuration.
pub fn parse_flag(name: &str, value: &str) -> Result<bool> {
  match value.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "0" | "false" | "no" | "off" => Ok(false),
    other => bail!("{} must be a boolean, got {:?}", name, other),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_flag_true_values() {
    for value in ["1", "true", "TRUE", "yes", " on "] {
      assert!(parse_flag("FLAG", value).unwrap(), "{}", value);
    }
  }

  #[test]
  fn test_parse_flag_false_values() {
    for value in ["0", "false", "No", "off"] {
      assert!(!parse_flag("FLAG", value).unwrap(), "{}", value);
    }
  }

  #[test]
  fn test_parse_flag_invalid() {
    let err = parse_flag("NOTIFICATION_HTML", "maybe").unwrap_err();
    assert!(err.to_string().contains("NOTIFICATION_HTML"));
  }
}
