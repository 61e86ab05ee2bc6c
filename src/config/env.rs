use super::raw::RawSettings;

/// Collects process environment variables that start with `prefix`.
///
/// The prefix is stripped, so with prefix `APP_` the variable `APP_MONGO_HOST`
/// yields the key `MONGO_HOST`. Variables whose name is exactly the prefix, or
/// whose value is not valid unicode, are skipped.
pub(crate) fn load_env_vars(prefix: &str) -> RawSettings {
    std::env::vars_os()
        .filter_map(|(key, value)| {
            let key = key.into_string().ok()?;
            let value = value.into_string().ok()?;
            let stripped = key.strip_prefix(prefix)?;
            if stripped.is_empty() {
                return None;
            }
            Some((stripped.to_string(), value))
        })
        .collect()
}
