use crate::FailResult;

use linfit_tasks_config::{YamlRead, canonicalize_keys};
use path_abs::FileRead;
use serde_yaml::{Value, Mapping};

/// The values given to `--config`, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSources(Vec<Value>);

impl ConfigSources {
    /// Each argument is either a path to a YAML file, or a literal written
    /// as `KEY:YAML` or `:YAML`.  Only the presence of a colon distinguishes
    /// the two; paths containing one cannot be given.
    ///
    /// Files are opened and parsed immediately.
    pub fn resolve_from_args<As>(args: As) -> FailResult<Self>
    where
        As: IntoIterator,
        As::Item: AsRef<str>,
    {
        args.into_iter()
            .map(|arg| resolve_from_arg(arg.as_ref()))
            .collect::<FailResult<Vec<_>>>()
            .map(ConfigSources)
    }

    /// Later sources take precedence.
    pub fn into_effective_yaml(self) -> Value {
        self.0.into_iter()
            .fold(Value::Mapping(Mapping::new()), merge)
    }
}

/// Keys are respelled in kebab-case, so that a camelCase key in one source
/// is overridden by the kebab-case key in a later one.
fn resolve_from_arg(s: &str) -> FailResult<Value> {
    let mut value = resolve_raw(s)?;
    canonicalize_keys(&mut value);
    Ok(value)
}

fn resolve_raw(s: &str) -> FailResult<Value> {
    let mut parts = s.splitn(2, ':');
    match (parts.next(), parts.next()) {
        (Some(""), Some(literal)) => Ok(YamlRead::from_reader(literal.as_bytes())?),
        (Some(key), Some(literal)) => {
            let value: Value = YamlRead::from_reader(literal.as_bytes())?;
            let mut mapping = Mapping::new();
            mapping.insert(Value::String(key.trim().into()), value);
            Ok(Value::Mapping(mapping))
        },
        (Some(path), None) => {
            debug!("Reading config file '{}'", path);
            Ok(YamlRead::from_reader(FileRead::open(path)?)?)
        },
        (None, _) => unreachable!("splitn always yields at least one item"),
    }
}

/// Takes the union of two mappings, preferring values from `b`.
/// For any other pair of values, simply takes `b`.
fn merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Mapping(mut a), Value::Mapping(b)) => {
            for (key, b_value) in b {
                let value = match a.remove(&key) {
                    None => b_value,
                    Some(a_value) => merge(a_value, b_value),
                };
                a.insert(key, value);
            }
            Value::Mapping(a)
        },
        (_, b) => b,
    }
}
