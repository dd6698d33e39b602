/// Looks `name` up in the driver's extension list.
///
/// Matching ignores ASCII case, and the `GL_` prefix desktop drivers put on every extension
/// is optional, so `"OES_texture_float"` finds `"GL_OES_texture_float"`. Returns the name
/// as the driver spells it.
pub fn find_extension<'a, I>(supported: I, name: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    if name.is_empty() {
        return None;
    }
    supported.into_iter().find(|ext| {
        ext.eq_ignore_ascii_case(name)
            || match (ext.get(..3), ext.get(3..)) {
                (Some(prefix), Some(rest)) => {
                    prefix.eq_ignore_ascii_case("GL_") && rest.eq_ignore_ascii_case(name)
                }
                _ => false,
            }
    })
}

/// Sorted copy of the supported extensions, so callers see a stable order.
pub(crate) fn sorted_extensions<'a, I>(supported: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut extensions: Vec<String> = supported.into_iter().cloned().collect();
    extensions.sort();
    extensions
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRIVER: [&str; 3] =
        ["GL_ARB_compute_shader", "GL_EXT_texture_filter_anisotropic", "GL_KHR_debug"];

    #[test]
    fn prefix_is_optional() {
        assert_eq!(
            find_extension(DRIVER, "EXT_texture_filter_anisotropic"),
            Some("GL_EXT_texture_filter_anisotropic")
        );
        assert_eq!(find_extension(DRIVER, "GL_KHR_debug"), Some("GL_KHR_debug"));
    }

    #[test]
    fn case_is_ignored() {
        assert_eq!(find_extension(DRIVER, "arb_compute_shader"), Some("GL_ARB_compute_shader"));
    }

    #[test]
    fn partial_names_do_not_match() {
        assert_eq!(find_extension(DRIVER, "compute_shader"), None);
        assert_eq!(find_extension(DRIVER, "KHR"), None);
        assert_eq!(find_extension(DRIVER, ""), None);
    }

    #[test]
    fn sorted_extensions_is_deterministic() {
        let set: std::collections::HashSet<String> =
            DRIVER.iter().rev().map(|s| s.to_string()).collect();
        assert_eq!(sorted_extensions(&set), DRIVER.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }
}
