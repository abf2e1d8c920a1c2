//! Seeder name resolution.
//!
//! A seeder registered without an explicit name is named after the function
//! that implements it. Rust exposes that identity through the callback's type
//! name (`my_app::seeds::categories_seeder`), from which only the trailing
//! identifier is kept. Closures have no such identity (their type name ends in
//! `{{closure}}`), so they must be registered with an explicit name.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::RegistryError;

static TRAILING_IDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:.*::)?(?P<name>[A-Za-z_][A-Za-z0-9_]*)$").expect("valid identifier pattern")
});

/// Derives a seeder name from the callback's declared identity.
///
/// Returns [`RegistryError::UnnamedSeeder`] when the callback has no
/// inspectable name, e.g. an anonymous closure.
pub fn resolve_name<F>(_callback: &F) -> Result<String, RegistryError> {
    let type_name = std::any::type_name::<F>();

    trailing_identifier(type_name)
        .map(str::to_owned)
        .ok_or_else(|| RegistryError::UnnamedSeeder {
            type_name: type_name.to_owned(),
        })
}

/// Returns the final `::`-separated segment of `path` if it is a plain identifier.
pub fn trailing_identifier(path: &str) -> Option<&str> {
    TRAILING_IDENT
        .captures(path)
        .and_then(|caps| caps.name("name"))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn dummy_seeder(_seeder: crate::Seeder) -> anyhow::Result<()> {
        Ok(())
    }

    fn plain_fn() {}

    #[test]
    fn test_resolves_async_fn_item() {
        assert_eq!(resolve_name(&dummy_seeder).unwrap(), "dummy_seeder");
    }

    #[test]
    fn test_resolves_plain_fn_item() {
        assert_eq!(resolve_name(&plain_fn).unwrap(), "plain_fn");
    }

    #[test]
    fn test_rejects_closure() {
        let closure = |_seeder: crate::Seeder| async { Ok::<(), anyhow::Error>(()) };
        let err = resolve_name(&closure).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::UnnamedSeeder { ref type_name } if type_name.ends_with("{{closure}}")
        ));
    }

    #[test]
    fn test_trailing_identifier_strips_path() {
        assert_eq!(
            trailing_identifier("simpleshop::seeds::categories::categories_seeder"),
            Some("categories_seeder")
        );
        assert_eq!(trailing_identifier("dummy_seeder"), Some("dummy_seeder"));
        assert_eq!(trailing_identifier("seed2"), Some("seed2"));
    }

    #[test]
    fn test_trailing_identifier_rejects_non_identifiers() {
        assert_eq!(trailing_identifier("app::main::{{closure}}"), None);
        assert_eq!(trailing_identifier("app::generic<i32>"), None);
        assert_eq!(trailing_identifier("app::"), None);
        assert_eq!(trailing_identifier(""), None);
    }
}
