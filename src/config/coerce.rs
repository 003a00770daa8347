//! Lenient scalar decoding.
//!
//! Config files are edited by hand and the same value is often written with
//! or without quotes. These deserializers accept any scalar that has an
//! unambiguous meaning for the target type and reject everything else with a
//! serde error, so the format's own diagnostics (field path, line) are kept.

use std::fmt;
use std::path::PathBuf;

use serde::de::{self, Deserializer, Unexpected, Visitor};

use crate::config::schema::DEFAULT_FILE_DIR;

/// Decode a string field, accepting numbers and booleans as their text.
///
/// Floats keep a decimal point (`1.0` becomes `"1.0"`, not `"1"`).
/// `null` decodes to the empty string.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(StringVisitor)
}

/// Decode a TCP port, accepting integers and numeric strings in `0..=65535`.
///
/// `null` decodes to 0.
pub fn port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(PortVisitor)
}

/// Decode a directory path. `null` and blank values fall back to
/// [`DEFAULT_FILE_DIR`], the same as a missing key.
pub fn file_dir<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = string(deserializer)?;
    if raw.trim().is_empty() {
        Ok(PathBuf::from(DEFAULT_FILE_DIR))
    } else {
        Ok(PathBuf::from(raw))
    }
}

struct StringVisitor;

impl<'de> Visitor<'de> for StringVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number or boolean")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        // Debug keeps the trailing ".0" that Display drops.
        Ok(format!("{v:?}"))
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }
}

struct PortVisitor;

impl<'de> Visitor<'de> for PortVisitor {
    type Value = u16;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a port number between 0 and 65535")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u16, E> {
        u16::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u16, E> {
        u16::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<u16, E> {
        if v.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&v) {
            Ok(v as u16)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u16, E> {
        v.trim()
            .parse::<u16>()
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<u16, E> {
        Ok(0)
    }

    fn visit_none<E: de::Error>(self) -> Result<u16, E> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "super::string")]
        label: String,
        #[serde(deserialize_with = "super::port")]
        port: u16,
    }

    fn yaml(input: &str) -> Result<Sample, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }

    #[test]
    fn test_unquoted_scalars_become_strings() {
        assert_eq!(yaml("label: 1.1\nport: 1").unwrap().label, "1.1");
        assert_eq!(yaml("label: 1.0\nport: 1").unwrap().label, "1.0");
        assert_eq!(yaml("label: 2\nport: 1").unwrap().label, "2");
        assert_eq!(yaml("label: true\nport: 1").unwrap().label, "true");
        assert_eq!(yaml("label: ~\nport: 1").unwrap().label, "");
    }

    #[test]
    fn test_port_from_numeric_string() {
        assert_eq!(yaml("label: x\nport: \"8080\"").unwrap().port, 8080);
        assert_eq!(yaml("label: x\nport: 8080").unwrap().port, 8080);
    }

    #[test]
    fn test_port_rejects_text_and_out_of_range() {
        let err = yaml("label: x\nport: abc").unwrap_err().to_string();
        assert!(err.contains("port"), "error should name the field: {err}");

        assert!(yaml("label: x\nport: 70000").is_err());
        assert!(yaml("label: x\nport: -1").is_err());
        assert!(yaml("label: x\nport: 80.5").is_err());
    }

    #[test]
    fn test_toml_scalars() {
        let sample: Sample = toml::from_str("label = 3.5\nport = \"443\"").unwrap();
        assert_eq!(sample.label, "3.5");
        assert_eq!(sample.port, 443);
    }
}
