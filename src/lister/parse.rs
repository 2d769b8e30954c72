//! Parsing of `<module> <version>` listings and module cache path encoding

use crate::domain::Dependency;

/// Parse lister output, one `"<coordinate> <version>"` record per line.
///
/// Lines with fewer than two tokens are skipped; this is how the main module
/// (listed without a version) drops out. Anything after the version, such as
/// a `=> replacement` clause, is ignored.
pub fn parse_module_list(output: &str) -> Vec<Dependency> {
    output
        .lines()
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            let name = tokens.next()?;
            let version = tokens.next()?;
            if version == "=>" {
                return None;
            }
            Some(Dependency::new(name, version))
        })
        .collect()
}

/// Encode a module path or version for use inside the module cache.
///
/// The cache lives on case-insensitive file systems too, so every upper-case
/// ASCII letter is written as `!` followed by its lower-case form.
pub fn escape_cache_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            escaped.push('!');
            escaped.push(c.to_ascii_lowercase());
        } else {
            escaped.push(c);
        }
    }
    escaped
}
