use anyhow::Result;
use regex::Regex;
use std::env;
use tracing::{debug, warn};

/// Substitute environment variables in the format `${VAR_NAME}` or `$VAR_NAME`
///
/// Unset variables keep their placeholder so validation can report them
/// instead of silently producing an empty value.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)\}|\$(\w+)").expect("substitution pattern is valid");
    let mut result = content.to_string();

    for caps in re.captures_iter(content) {
        let var_name = caps
            .get(1)
            .or(caps.get(2))
            .expect("pattern always captures a name")
            .as_str();
        let placeholder = caps.get(0).expect("whole match always present").as_str();

        match env::var(var_name) {
            Ok(value) => {
                debug!(var = var_name, "substituting environment variable");
                result = result.replace(placeholder, &value);
            }
            Err(_) => {
                warn!(var = var_name, "environment variable not set");
            }
        }
    }

    Ok(result)
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    let re = Regex::new(r"\$\{(\w+)\}|\$(\w+)").expect("substitution pattern is valid");
    re.is_match(content)
}
