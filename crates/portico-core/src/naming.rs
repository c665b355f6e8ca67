//! Deterministic artifact names.
//!
//! Validators and models need names that are unique within an API, stable
//! across builds, and alphanumeric. They are derived from the method, the
//! route path and the artifact's role:
//!
//! ```
//! use portico_core::naming::artifact_name;
//!
//! assert_eq!(
//!     artifact_name("post", "/lambda/params/{paramId}", "Request-Model"),
//!     "PostLambdaParamsParamidRequestModel"
//! );
//! ```

use std::sync::OnceLock;

use regex::Regex;

/// Role of a request validator.
pub const REQUEST_VALIDATOR: &str = "Request-Validator";

/// Role of a request model.
pub const REQUEST_MODEL: &str = "Request-Model";

/// Role of a shorthand (status 200) response model.
pub const RESPONSE_MODEL: &str = "Response-Model";

/// Role of a response model for an explicit status code.
#[must_use]
pub fn response_model_role(status_code: u16) -> String {
    format!("{RESPONSE_MODEL}-{status_code}")
}

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new("[^a-zA-Z0-9]+").expect("valid regex"))
}

/// Turns arbitrary text into a PascalCase alphanumeric identifier.
///
/// Every run of non-alphanumeric characters separates words; each word keeps
/// its first character uppercased and the rest lowercased.
#[must_use]
pub fn to_alphanumeric_name(text: &str) -> String {
    separator()
        .split(text)
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Builds the name of an artifact attached to `method` on `path`.
#[must_use]
pub fn artifact_name(method: &str, path: &str, role: &str) -> String {
    [method, path, role]
        .iter()
        .map(|part| to_alphanumeric_name(part))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_names() {
        assert_eq!(
            artifact_name("get", "/users/{userId}", REQUEST_VALIDATOR),
            "GetUsersUseridRequestValidator"
        );
        assert_eq!(
            artifact_name("DELETE", "/api/v1/items", RESPONSE_MODEL),
            "DeleteApiV1ItemsResponseModel"
        );
        assert_eq!(
            artifact_name("put", "/", &response_model_role(404)),
            "PutResponseModel404"
        );
    }

    #[test]
    fn test_words_are_lowercased_after_first_char() {
        assert_eq!(to_alphanumeric_name("HELLO-wORLD"), "HelloWorld");
        assert_eq!(to_alphanumeric_name("snake_case_path"), "SnakeCasePath");
        assert_eq!(to_alphanumeric_name("---"), "");
    }

    #[test]
    fn test_non_ascii_is_a_separator() {
        assert_eq!(to_alphanumeric_name("caf\u{e9}-menu"), "CafMenu");
    }

    proptest! {
        #[test]
        fn test_names_are_alphanumeric_and_stable(
            method in "(get|post|put|delete)",
            path in "(/[a-zA-Z0-9_{}.+-]{0,8}){0,5}",
            role in "[A-Za-z-]{0,20}",
        ) {
            let first = artifact_name(&method, &path, &role);
            let second = artifact_name(&method, &path, &role);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }
}
